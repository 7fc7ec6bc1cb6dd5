use serde::Serialize;

use crate::annotations::Annotations;

use super::build::{GroupNode, NodeKind};

/// Rendering classes of one hierarchy node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClasses {
    pub root_node: bool,
    pub grouping_node: bool,
    pub leaf_node: bool,
    pub contains_search_result: bool,
    pub contains_no_search_result: bool,
    pub search_result: bool,
    pub search_excluded: bool,
    pub is_changed: bool,
    pub is_added: bool,
    pub is_removed: bool,
    pub hidden: bool,
}

impl NodeClasses {
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.root_node, "rootNode"),
            (self.grouping_node, "groupingNode"),
            (self.leaf_node, "leafNode"),
            (self.contains_search_result, "containsSearchResult"),
            (self.contains_no_search_result, "containsNoSearchResult"),
            (self.search_result, "searchResult"),
            (self.search_excluded, "searchExcluded"),
            (self.is_changed, "isChanged"),
            (self.is_added, "isAdded"),
            (self.is_removed, "isRemoved"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// `has_search` is whether a query is active; without one no search
/// classes are set. Leaves are hidden when `show_nodes` is off.
pub fn classify(
    node: &GroupNode,
    annotations: &Annotations,
    has_search: bool,
    show_nodes: bool,
) -> NodeClasses {
    let inner = node.depth > 0 && node.height > 0;
    let leaf = node.depth > 0 && node.height == 0;

    let (is_result, changes) = match node.kind {
        NodeKind::Leaf { record } => (annotations.is_search_result(record), annotations.changes(record)),
        _ => (false, Default::default()),
    };

    NodeClasses {
        root_node: node.depth == 0,
        grouping_node: inner,
        leaf_node: node.height == 0,
        contains_search_result: has_search && inner && node.search_result_count > 0,
        contains_no_search_result: has_search && inner && node.search_result_count == 0,
        search_result: has_search && leaf && is_result,
        search_excluded: has_search && leaf && !is_result,
        is_changed: leaf && changes.is_changed,
        is_added: leaf && changes.is_added,
        is_removed: leaf && changes.is_removed,
        hidden: !show_nodes && node.height == 0,
    }
}
