use std::collections::HashMap;

use serde::Serialize;

use crate::annotations::Annotations;
use crate::dataset::Dataset;
use crate::fields::FieldDescriptor;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Group { field: String },
    Leaf { record: usize },
}

/// Node of the grouped hierarchy handed to the packing layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub field_value: String,
    pub depth: usize,
    /// Distance to the deepest leaf below; 0 for leaves.
    pub height: usize,
    /// Record positions of every leaf below this node.
    pub records: Vec<usize>,
    pub search_result_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<GroupNode>,
}

impl GroupNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn descendants(&self) -> Vec<&GroupNode> {
        let mut nodes = vec![self];
        let mut cursor = 0;
        while cursor < nodes.len() {
            let node = nodes[cursor];
            nodes.extend(node.children.iter());
            cursor += 1;
        }
        nodes
    }

    pub fn leaves(&self) -> impl Iterator<Item = &GroupNode> {
        self.descendants().into_iter().filter(|node| node.is_leaf())
    }
}

/// Groups records level by level on `grouping`. Buckets keep the order in
/// which their value first appears; records without the field land in a
/// bucket with an empty value.
pub fn group(dataset: &Dataset, annotations: &Annotations, grouping: &[FieldDescriptor]) -> GroupNode {
    let records = (0..dataset.len()).collect::<Vec<_>>();
    let children = build_level(dataset, annotations, &records, grouping, 1);
    finish(NodeKind::Root, String::new(), 0, records, children, annotations)
}

fn build_level(
    dataset: &Dataset,
    annotations: &Annotations,
    records: &[usize],
    grouping: &[FieldDescriptor],
    depth: usize,
) -> Vec<GroupNode> {
    let Some((field, rest)) = grouping.split_first() else {
        return records
            .iter()
            .map(|&record| {
                finish(
                    NodeKind::Leaf { record },
                    record.to_string(),
                    depth,
                    vec![record],
                    Vec::new(),
                    annotations,
                )
            })
            .collect();
    };

    let mut buckets: Vec<(String, Vec<usize>)> = Vec::new();
    let mut bucket_by_value: HashMap<String, usize> = HashMap::new();
    for &record in records {
        let value = dataset
            .get(record)
            .and_then(|entry| entry.resolve(&field.path))
            .map(ToString::to_string)
            .unwrap_or_default();
        let slot = *bucket_by_value.entry(value.clone()).or_insert_with(|| {
            buckets.push((value, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(record);
    }

    let field_id = field.id();
    buckets
        .into_iter()
        .map(|(value, members)| {
            let children = build_level(dataset, annotations, &members, rest, depth + 1);
            finish(
                NodeKind::Group {
                    field: field_id.clone(),
                },
                value,
                depth,
                members,
                children,
                annotations,
            )
        })
        .collect()
}

fn finish(
    kind: NodeKind,
    field_value: String,
    depth: usize,
    records: Vec<usize>,
    children: Vec<GroupNode>,
    annotations: &Annotations,
) -> GroupNode {
    let height = children
        .iter()
        .map(|child| child.height + 1)
        .max()
        .unwrap_or(0);
    let search_result_count = records
        .iter()
        .filter(|&&record| annotations.is_search_result(record))
        .count();

    GroupNode {
        kind,
        field_value,
        depth,
        height,
        records,
        search_result_count,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_payload;

    fn dataset() -> Dataset {
        parse_payload(
            r#"[
                { "uid": "a", "role": { "role": "server" }, "site": "east" },
                { "uid": "b", "role": { "role": "printer" }, "site": "west" },
                { "uid": "c", "role": { "role": "server" }, "site": "west" },
                { "uid": "d", "site": "east" }
            ]"#,
        )
        .unwrap()
        .dataset
    }

    fn field(segments: &[&str]) -> FieldDescriptor {
        FieldDescriptor::inferred(segments.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn groups_in_first_seen_order() {
        let dataset = dataset();
        let annotations = Annotations::for_dataset(&dataset);
        let root = group(&dataset, &annotations, &[field(&["role", "role"])]);

        let values = root
            .children
            .iter()
            .map(|child| child.field_value.as_str())
            .collect::<Vec<_>>();
        assert_eq!(values, ["server", "printer", ""]);
        assert_eq!(root.children[0].records, [0, 2]);
        assert_eq!(root.height, 2);
        assert_eq!(root.children[0].height, 1);
        assert_eq!(root.children[0].children[0].depth, 2);
    }

    #[test]
    fn nests_one_level_per_field() {
        let dataset = dataset();
        let annotations = Annotations::for_dataset(&dataset);
        let root = group(&dataset, &annotations, &[field(&["site"]), field(&["role", "role"])]);

        assert_eq!(root.height, 3);
        let east = &root.children[0];
        assert_eq!(east.field_value, "east");
        assert_eq!(
            east.kind,
            NodeKind::Group {
                field: "site".to_owned()
            }
        );
        assert_eq!(east.children.len(), 2);
        assert_eq!(root.leaves().count(), 4);
    }

    #[test]
    fn counts_search_results_per_group() {
        let dataset = dataset();
        let mut annotations = Annotations::for_dataset(&dataset);
        annotations.mark_search_result(1);
        annotations.mark_search_result(2);

        let root = group(&dataset, &annotations, &[field(&["site"])]);
        assert_eq!(root.search_result_count, 2);
        assert_eq!(root.children[0].search_result_count, 0);
        assert_eq!(root.children[1].search_result_count, 2);
    }

    #[test]
    fn no_grouping_hangs_leaves_off_the_root() {
        let dataset = dataset();
        let annotations = Annotations::for_dataset(&dataset);
        let root = group(&dataset, &annotations, &[]);
        assert_eq!(root.children.len(), 4);
        assert!(root.children.iter().all(GroupNode::is_leaf));
        assert_eq!(root.height, 1);
    }
}
