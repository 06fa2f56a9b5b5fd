//! DOM node data and tree errors.

use core::fmt::{Display, Formatter, Result as FmtResult};
use indextree::{NodeError, NodeId};
use smallvec::SmallVec;
use std::error::Error;

/// Data stored for each DOM node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl NodeData {
    /// Element payload, if this node is an element.
    pub const fn as_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable element payload, if this node is an element.
    pub const fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Data for an element node. Attribute order is insertion order, which keeps
/// serialisation of edited attributes (such as `style`) stable.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-cased local name.
    pub tag_name: String,
    pub attributes: SmallVec<[(String, String); 4]>,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: SmallVec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place when it already exists.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            value.clone_into(&mut slot.1);
            return;
        }
        self.attributes
            .push((name.to_ascii_lowercase(), value.to_owned()));
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).1)
    }

    /// Class tokens from the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|token| token == class)
    }
}

/// Errors raised by tree operations.
#[derive(Debug)]
pub enum DomError {
    /// The node id does not belong to this document.
    NodeNotFound(NodeId),
    /// The operation needs an element but got another kind of node.
    NotAnElement(NodeId),
    /// The insertion would break the tree (e.g. appending an ancestor).
    Hierarchy(NodeError),
}

impl Display for DomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NodeNotFound(node) => write!(f, "node {node} is not part of this document"),
            Self::NotAnElement(node) => write!(f, "node {node} is not an element"),
            Self::Hierarchy(error) => write!(f, "hierarchy request error: {error}"),
        }
    }
}

impl Error for DomError {}

impl From<NodeError> for DomError {
    fn from(error: NodeError) -> Self {
        Self::Hierarchy(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut element = ElementData::new("LI");
        element.set_attribute("data-task-id", "a");
        element.set_attribute("class", "task");
        element.set_attribute("DATA-TASK-ID", "b");
        assert_eq!(element.tag_name, "li");
        assert_eq!(element.attribute("data-task-id"), Some("b"));
        assert_eq!(element.attributes[0].0, "data-task-id");
        assert_eq!(element.attributes.len(), 2);
    }

    #[test]
    fn classes_split_on_whitespace() {
        let mut element = ElementData::new("div");
        element.set_attribute("class", "  task-row\thovered ");
        assert!(element.has_class("hovered"));
        assert!(element.has_class("task-row"));
        assert!(!element.has_class("task"));
        assert_eq!(element.remove_attribute("class").as_deref(), Some("  task-row\thovered "));
        assert_eq!(element.classes().count(), 0);
    }
}
