use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// One node of the search visualization tree.
///
/// Serializes to the shape the dashboard reads:
/// `{"move": "Ng1f3", "evaluation": 35, "pruned": false, "children": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchNode {
    #[serde(rename = "move")]
    pub label: String,
    pub evaluation: Option<i32>,
    pub pruned: bool,
    pub children: Vec<SearchNode>,
}

impl SearchNode {
    pub const ROOT_LABEL: &'static str = "Root";

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            evaluation: None,
            pruned: false,
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(Self::ROOT_LABEL)
    }

    /// Appends a child and returns it for the recursive call to fill in
    pub fn push_child(&mut self, label: impl Into<String>) -> &mut SearchNode {
        self.children.push(SearchNode::new(label));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SearchNode::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SearchNode::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn to_json(&self) -> miette::Result<String> {
        serde_json::to_string_pretty(self).into_diagnostic()
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let mut root = SearchNode::root();
        let child = root.push_child("Ng1f3");
        child.evaluation = Some(50);
        child.pruned = true;

        let value: serde_json::Value = serde_json::from_str(&root.to_json().unwrap()).unwrap();
        assert_eq!(value["move"], "Root");
        assert_eq!(value["evaluation"], serde_json::Value::Null);
        assert_eq!(value["children"][0]["move"], "Ng1f3");
        assert_eq!(value["children"][0]["evaluation"], 50);
        assert_eq!(value["children"][0]["pruned"], true);
        assert_eq!(value["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_size_and_depth() {
        let mut root = SearchNode::root();
        root.push_child("e2e4").push_child("e7e5");
        root.push_child("d2d4");
        assert_eq!(root.size(), 4);
        assert_eq!(root.depth(), 3);
    }
}
