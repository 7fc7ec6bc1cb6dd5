use std::cmp::Reverse;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::dataset::Dataset;
use crate::fields::Configuration;

use super::document::{SearchDocument, flatten_documents};
use super::{SearchCapability, SearchHit};

/// Added on top of the skim score when a field equals the term.
const EXACT_BONUS: i64 = 1_000;
/// Added when a field starts with the term.
const PREFIX_BONUS: i64 = 500;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    let score = matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))?;

    let bonus = if text.eq_ignore_ascii_case(query) {
        EXACT_BONUS
    } else if text.to_ascii_lowercase().starts_with(&query.to_ascii_lowercase()) {
        PREFIX_BONUS
    } else {
        0
    };
    Some(score + bonus)
}

/// Default index: each whitespace-separated term is scored against every
/// field with the skim matcher. A document matches when any term does and
/// ranks by the sum of its best per-term scores. Fields equal to a term, then
/// fields starting with it, outrank looser subsequence matches.
#[derive(Clone, Debug)]
pub struct FuzzyIndex {
    field_ids: Vec<String>,
    documents: Vec<SearchDocument>,
}

impl FuzzyIndex {
    pub fn build(dataset: &Dataset, configuration: &Configuration) -> Self {
        Self {
            field_ids: configuration.fields.iter().map(|field| field.id()).collect(),
            documents: flatten_documents(dataset, configuration),
        }
    }

    pub fn field_ids(&self) -> &[String] {
        &self.field_ids
    }

    fn score(&self, matcher: &SkimMatcherV2, document: &SearchDocument, terms: &[&str]) -> Option<i64> {
        let mut total = None;
        for term in terms {
            let best = document
                .fields
                .iter()
                .filter_map(|field| fuzzy_match_score(matcher, &field.text, term))
                .max();
            if let Some(score) = best {
                total = Some(total.unwrap_or(0) + score);
            }
        }
        total
    }
}

impl SearchCapability for FuzzyIndex {
    fn search(&self, query: &str) -> Vec<SearchHit> {
        let terms = query.split_whitespace().collect::<Vec<_>>();
        if terms.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut hits = self
            .documents
            .iter()
            .filter_map(|document| {
                self.score(&matcher, document, &terms).map(|score| SearchHit {
                    reference: document.reference,
                    score,
                })
            })
            .collect::<Vec<_>>();

        hits.sort_by_key(|hit| (Reverse(hit.score), hit.reference));
        hits
    }

    fn document_count(&self) -> usize {
        self.documents.len()
    }
}
