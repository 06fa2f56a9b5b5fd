//! The document: DOM tree and style sheets of one page.

use crate::cssom::{CssomError, StyleSheet, StyleSheetSource};
use crate::node::{DomError, ElementData, NodeData};
use crate::selectors::SelectorList;
use crate::style_attr;
use indextree::{Arena, Node, NodeId};
use url::Url;

/// A page: arena-backed DOM tree plus the CSSOM attached to it.
#[derive(Debug)]
pub struct Document {
    arena: Arena<NodeData>,
    root: NodeId,
    url: Option<Url>,
    style_sheets: Vec<StyleSheet>,
}

impl Document {
    /// Create an empty document containing only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Document);
        Self {
            arena,
            root,
            url: None,
            style_sheets: Vec::new(),
        }
    }

    /// The document node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// Whether `node` was created by this document.
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some_and(|entry| !entry.is_removed())
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena
            .new_node(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_owned()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Comment(text.to_owned()))
    }

    pub fn node_data(&self, node: NodeId) -> Option<&NodeData> {
        self.arena
            .get(node)
            .filter(|entry| !entry.is_removed())
            .map(Node::get)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.node_data(node).and_then(NodeData::as_element)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        let entry = self
            .arena
            .get_mut(node)
            .filter(|entry| !entry.is_removed())
            .ok_or(DomError::NodeNotFound(node))?;
        entry
            .get_mut()
            .as_element_mut()
            .ok_or(DomError::NotAnElement(node))
    }

    fn ensure_contains(&self, node: NodeId) -> Result<(), DomError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(DomError::NodeNotFound(node))
        }
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached somewhere (DOM `appendChild` semantics).
    ///
    /// # Errors
    /// Fails if either node is unknown or if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_contains(parent)?;
        self.ensure_contains(child)?;
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// # Errors
    /// Fails if the node is unknown.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.ensure_contains(node)?;
        node.detach(&mut self.arena);
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena
            .get(node)
            .filter(|entry| !entry.is_removed())?
            .parent()
    }

    /// All child nodes in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        node.children(&self.arena).collect()
    }

    /// Element children in order (DOM `children`).
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        node.children(&self.arena)
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        node.descendants(&self.arena).skip(1).collect()
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag_name.as_str())
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attribute(name)
    }

    /// # Errors
    /// Fails if `node` is unknown or not an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(node)?.set_attribute(name, value);
        Ok(())
    }

    /// # Errors
    /// Fails if `node` is unknown or not an element.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut(node)?.remove_attribute(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.has_class(class))
    }

    /// Add a class token (`classList.add`). No-op when already present.
    ///
    /// # Errors
    /// Fails if `node` is unknown or not an element.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.element_mut(node)?;
        if element.has_class(class) {
            return Ok(());
        }
        let mut tokens: Vec<&str> = element.classes().collect();
        tokens.push(class);
        let joined = tokens.join(" ");
        element.set_attribute("class", &joined);
        Ok(())
    }

    /// Remove a class token (`classList.remove`).
    ///
    /// # Errors
    /// Fails if `node` is unknown or not an element.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let element = self.element_mut(node)?;
        if !element.has_class(class) {
            return Ok(());
        }
        let joined = element
            .classes()
            .filter(|token| *token != class)
            .collect::<Vec<_>>()
            .join(" ");
        element.set_attribute("class", &joined);
        Ok(())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        if !self.contains(node) {
            return String::new();
        }
        node.descendants(&self.arena)
            .filter_map(|descendant| match self.arena.get(descendant).map(Node::get) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children of `node` with a single text node.
    ///
    /// # Errors
    /// Fails if `node` is unknown.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.ensure_contains(node)?;
        for child in self.children(node) {
            child.remove_subtree(&mut self.arena);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node)?;
        }
        Ok(())
    }

    /// First element in the tree whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.get_attribute(*node, "id") == Some(id))
    }

    /// First descendant of `scope` matching `selectors`.
    pub fn query_selector(&self, scope: NodeId, selectors: &str) -> Option<NodeId> {
        self.select_first(scope, &SelectorList::parse(selectors))
    }

    /// All descendants of `scope` matching `selectors`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selectors: &str) -> Vec<NodeId> {
        self.select_all(scope, &SelectorList::parse(selectors))
    }

    /// [`Self::query_selector`] with a pre-parsed selector list.
    pub fn select_first(&self, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| selectors.matches(self, *node))
    }

    /// [`Self::query_selector_all`] with a pre-parsed selector list.
    pub fn select_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| selectors.matches(self, *node))
            .collect()
    }

    /// Value of a property declared in the element's inline `style` attribute.
    pub fn inline_style_property(&self, node: NodeId, property: &str) -> Option<String> {
        style_attr::style_property(self.get_attribute(node, "style")?, property)
    }

    /// Set one property inside the inline `style` attribute (`style.setProperty`).
    ///
    /// # Errors
    /// Fails if `node` is unknown or not an element.
    pub fn set_style_property(
        &mut self,
        node: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let element = self.element_mut(node)?;
        let updated = style_attr::with_property(
            element.attribute("style").unwrap_or_default(),
            property,
            value,
        );
        element.set_attribute("style", &updated);
        Ok(())
    }

    pub fn add_style_sheet(&mut self, sheet: StyleSheet) {
        self.style_sheets.push(sheet);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Sheets parsed from the page are always enumerable, so this never fails;
/// the error path exists for sources backed by a live browser.
impl StyleSheetSource for Document {
    fn style_sheets(&self) -> Result<&[StyleSheet], CssomError> {
        Ok(&self.style_sheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with_rows(doc: &mut Document, count: usize) -> (NodeId, Vec<NodeId>) {
        let list = doc.create_element("ul");
        doc.append_child(doc.root(), list).unwrap();
        let rows = (0..count)
            .map(|index| {
                let row = doc.create_element("li");
                doc.set_attribute(row, "data-task-id", &format!("t{index}"))
                    .unwrap();
                doc.append_child(list, row).unwrap();
                row
            })
            .collect();
        (list, rows)
    }

    #[test]
    fn append_child_moves_existing_node_to_end() {
        let mut doc = Document::new();
        let (list, rows) = list_with_rows(&mut doc, 3);
        doc.append_child(list, rows[0]).unwrap();
        assert_eq!(doc.element_children(list), vec![rows[1], rows[2], rows[0]]);
    }

    #[test]
    fn append_ancestor_is_rejected() {
        let mut doc = Document::new();
        let (list, rows) = list_with_rows(&mut doc, 1);
        let error = doc.append_child(rows[0], list);
        assert!(matches!(error, Err(DomError::Hierarchy(_))));
        assert_eq!(doc.parent(rows[0]), Some(list));
    }

    #[test]
    fn class_list_round_trip() {
        let mut doc = Document::new();
        let (_, rows) = list_with_rows(&mut doc, 1);
        doc.set_attribute(rows[0], "class", "task-row").unwrap();
        doc.add_class(rows[0], "hovered").unwrap();
        doc.add_class(rows[0], "hovered").unwrap();
        assert_eq!(doc.get_attribute(rows[0], "class"), Some("task-row hovered"));
        doc.remove_class(rows[0], "hovered").unwrap();
        assert_eq!(doc.get_attribute(rows[0], "class"), Some("task-row"));
    }

    #[test]
    fn text_content_replaces_children() {
        let mut doc = Document::new();
        let (_, rows) = list_with_rows(&mut doc, 1);
        let span = doc.create_element("span");
        let text = doc.create_text("None");
        doc.append_child(span, text).unwrap();
        doc.append_child(rows[0], span).unwrap();
        assert_eq!(doc.text_content(rows[0]), "None");
        doc.set_text_content(span, "Needs label").unwrap();
        assert_eq!(doc.text_content(rows[0]), "Needs label");
        assert_eq!(doc.children(span).len(), 1);
    }

    #[test]
    fn attribute_operations_require_elements() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        assert!(matches!(
            doc.set_attribute(text, "id", "a"),
            Err(DomError::NotAnElement(_))
        ));
    }
}
