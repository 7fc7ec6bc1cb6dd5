mod document;
mod fuzzy;
mod session;
mod substring;

use serde::Serialize;
use tracing::{debug, warn};

use crate::annotations::Annotations;
use crate::dataset::{Dataset, Record};

pub use document::{DocumentField, SearchDocument, flatten_documents};
pub use fuzzy::FuzzyIndex;
pub use session::{SearchSession, SearchState};
pub use substring::SubstringIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(rename = "ref")]
    pub reference: usize,
    pub score: i64,
}

/// A built, immutable index. `reference` values in hits are record
/// positions in the dataset the index was built from.
pub trait SearchCapability: Send + Sync {
    fn search(&self, query: &str) -> Vec<SearchHit>;

    fn document_count(&self) -> usize;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub query_string: String,
    /// Record positions in rank order.
    pub results: Vec<usize>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.results
            .iter()
            .filter_map(|&position| dataset.get(position))
    }
}

/// Runs `query` and rewrites the search flags in `annotations`.
///
/// Every flag is reset first. A blank query, a missing index, or an index
/// built over a dataset of a different length all leave the flags cleared
/// and return no results.
pub fn run_search(
    query: &str,
    dataset: &Dataset,
    index: Option<&dyn SearchCapability>,
    annotations: &mut Annotations,
) -> SearchOutcome {
    annotations.align_to(dataset);
    annotations.clear_search_results();

    let mut outcome = SearchOutcome {
        query_string: query.to_owned(),
        results: Vec::new(),
    };

    let query = query.trim();
    let Some(index) = index else {
        return outcome;
    };
    if query.is_empty() {
        return outcome;
    }

    if index.document_count() != dataset.len() {
        warn!(
            indexed = index.document_count(),
            records = dataset.len(),
            "search index is stale; ignoring query"
        );
        return outcome;
    }

    for hit in index.search(query) {
        if annotations.mark_search_result(hit.reference) {
            outcome.results.push(hit.reference);
        }
    }

    debug!(query, results = outcome.results.len(), "search applied");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_payload;
    use crate::fields::infer;

    fn fixture() -> (Dataset, FuzzyIndex) {
        let dataset = parse_payload(
            r#"[
                { "uid": "uid1", "role": { "role": "role", "confidence": 80 } },
                { "uid": "uid2", "role": { "role": "role", "confidence": 80 } }
            ]"#,
        )
        .unwrap()
        .dataset;
        let index = FuzzyIndex::build(&dataset, &infer(&dataset, None));
        (dataset, index)
    }

    #[test]
    fn flags_matches_and_returns_records_in_rank_order() {
        let (dataset, index) = fixture();
        let mut annotations = Annotations::for_dataset(&dataset);

        let outcome = run_search("uid1", &dataset, Some(&index), &mut annotations);

        assert_eq!(outcome.records(&dataset).next(), dataset.get(0));
        assert!(annotations.is_search_result(0));
        assert!(!annotations.is_search_result(1));
    }

    #[test]
    fn results_follow_rank_not_dataset_order() {
        let dataset = parse_payload(
            r#"[
                { "name": "gateway alpha" },
                { "name": "alpha" },
                { "name": "a-l-p-h-a" },
                { "name": "alpha" }
            ]"#,
        )
        .unwrap()
        .dataset;
        let index = FuzzyIndex::build(&dataset, &infer(&dataset, None));
        let mut annotations = Annotations::for_dataset(&dataset);

        let outcome = run_search("alpha", &dataset, Some(&index), &mut annotations);

        assert_eq!(outcome.results, [1, 3, 2, 0]);
        let ranked = outcome
            .records(&dataset)
            .filter_map(|record| record.get("name"))
            .map(|name| serde_json::to_string(name).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(ranked, [r#""alpha""#, r#""alpha""#, r#""a-l-p-h-a""#, r#""gateway alpha""#]);

        let in_place = dataset
            .records()
            .iter()
            .filter_map(|record| record.get("name"))
            .map(|name| serde_json::to_string(name).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(in_place[0], r#""gateway alpha""#);
        assert!((0..4).all(|position| annotations.is_search_result(position)));
        assert!(!annotations.is_search_result(4));
    }

    #[test]
    fn empty_query_clears_flags() {
        let (dataset, index) = fixture();
        let mut annotations = Annotations::for_dataset(&dataset);
        run_search("uid1", &dataset, Some(&index), &mut annotations);

        let outcome = run_search("", &dataset, Some(&index), &mut annotations);

        assert!(outcome.is_empty());
        assert_eq!(annotations.search_result_count(), 0);
    }

    #[test]
    fn missing_index_clears_flags() {
        let (dataset, index) = fixture();
        let mut annotations = Annotations::for_dataset(&dataset);
        run_search("uid", &dataset, Some(&index), &mut annotations);
        assert_eq!(annotations.search_result_count(), 2);

        let outcome = run_search("uid", &dataset, None, &mut annotations);
        assert!(outcome.is_empty());
        assert_eq!(annotations.search_result_count(), 0);
    }

    #[test]
    fn new_query_does_not_inherit_previous_flags() {
        let (dataset, index) = fixture();
        let mut annotations = Annotations::for_dataset(&dataset);
        run_search("uid1", &dataset, Some(&index), &mut annotations);
        run_search("uid2", &dataset, Some(&index), &mut annotations);

        assert!(!annotations.is_search_result(0));
        assert!(annotations.is_search_result(1));
    }

    #[test]
    fn stale_index_yields_no_results() {
        let (dataset, index) = fixture();
        let grown = Dataset::new(
            dataset
                .records()
                .iter()
                .chain(dataset.records())
                .cloned()
                .collect(),
        );
        let mut annotations = Annotations::for_dataset(&grown);
        annotations.mark_search_result(3);

        let outcome = run_search("uid1", &grown, Some(&index), &mut annotations);
        assert!(outcome.is_empty());
        assert_eq!(annotations.search_result_count(), 0);
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        let (dataset, index) = fixture();
        let mut annotations = Annotations::for_dataset(&dataset);
        let first = run_search("role", &dataset, Some(&index), &mut annotations);
        let flags = annotations.clone();
        let second = run_search("role", &dataset, Some(&index), &mut annotations);

        assert_eq!(first, second);
        assert_eq!(flags, annotations);
    }
}
