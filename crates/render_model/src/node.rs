//! Preview node tree

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An element in the preview tree. Inline styles may include custom
/// properties (`--name`), which descendants inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PreviewNode>,
}

impl PreviewNode {
    /// Create an empty element
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create an element holding text
    pub fn text_element(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::element(tag).with_text(text)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: PreviewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = PreviewNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push_child(&mut self, child: PreviewNode) {
        self.children.push(child);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.style.insert(property.into(), value.into());
    }

    pub fn remove_style(&mut self, property: &str) -> Option<String> {
        self.style.remove(property)
    }

    /// Depth-first search for an element by id, including `self`
    pub fn find_by_id(&self, id: &str) -> Option<&PreviewNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    /// Path of nodes from `self` down to the element with `id`
    pub fn path_to(&self, id: &str) -> Option<Vec<&PreviewNode>> {
        if self.id.as_deref() == Some(id) {
            return Some(vec![self]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// Concatenated text of this node and its descendants, space separated
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            parts.push(text);
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PreviewNode::node_count).sum::<usize>()
    }

    /// Visit every node in this subtree, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a PreviewNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PreviewNode {
        PreviewNode::element("div")
            .with_id("root")
            .with_child(
                PreviewNode::element("section")
                    .with_id("skills")
                    .with_child(PreviewNode::text_element("span", "Rust"))
                    .with_child(PreviewNode::text_element("span", "SQL")),
            )
            .with_child(PreviewNode::text_element("p", "Footer"))
    }

    #[test]
    fn test_find_by_id() {
        let root = sample();
        assert_eq!(root.find_by_id("skills").map(|n| n.tag.as_str()), Some("section"));
        assert!(root.find_by_id("missing").is_none());
    }

    #[test]
    fn test_path_to() {
        let root = sample();
        let path = root.path_to("skills").unwrap();
        let ids: Vec<_> = path.iter().map(|n| n.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("root"), Some("skills")]);
    }

    #[test]
    fn test_text_content() {
        assert_eq!(sample().text_content(), "Rust SQL Footer");
    }

    #[test]
    fn test_clone_is_detached() {
        let original = sample();
        let mut copy = original.clone();
        copy.children[0].children.clear();
        copy.set_style("border", "none");
        assert_eq!(original.children[0].children.len(), 2);
        assert!(original.style_value("border").is_none());
    }

    #[test]
    fn test_node_count_and_walk() {
        let root = sample();
        assert_eq!(root.node_count(), 5);
        let mut tags = Vec::new();
        root.walk(&mut |node| tags.push(node.tag.as_str()));
        assert_eq!(tags, vec!["div", "section", "span", "span", "p"]);
    }
}
