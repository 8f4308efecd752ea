//! In-memory document.
//!
//! A flat, ordered list of element nodes with just enough structure for the UI
//! layer: ids, classes, inline styles, text/value, fixed measurements, and
//! sibling order. Every write through [`ElementMutator`] is appended to a
//! mutation log so tests can assert on exactly what was touched and in which
//! order.

use std::collections::{BTreeMap, BTreeSet};

use crate::{DomError, ElementLookup, ElementMutator, Locator, NewNode, NodeContent, StyleProperty};

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

/// One element of a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<StyleProperty, String>,
    /// Text content (or raw markup when `raw_markup` is set).
    pub text: String,
    pub raw_markup: bool,
    pub value: String,
    pub offset_height: f64,
    pub margin_bottom: f64,
}

impl MemoryNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, property: StyleProperty, value: impl Into<String>) -> Self {
        self.styles.insert(property, value.into());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.offset_height = height;
        self
    }

    #[must_use]
    pub fn with_margin_bottom(mut self, margin: f64) -> Self {
        self.margin_bottom = margin;
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    #[must_use]
    pub fn style(&self, property: StyleProperty) -> Option<&str> {
        self.styles.get(&property).map(String::as_str)
    }

    /// Match a simple selector: `#id`, `.class`, or a bare tag name.
    fn matches_query(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.has_class(class)
        } else {
            !selector.is_empty() && self.tag == selector
        }
    }

    fn matches(&self, locator: &Locator) -> bool {
        match locator {
            Locator::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Locator::Class(class) => self.has_class(class),
            Locator::Query(selector) => self.matches_query(selector),
        }
    }
}

/// What a logged write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    SetStyle(StyleProperty, String),
    RemoveStyle(StyleProperty),
    AddClass(String),
    RemoveClass(String),
    SetText(String),
    SetValue(String),
    /// Node was inserted as the next sibling of `after`.
    Inserted { after: NodeKey },
    Removed,
}

/// One logged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub node: NodeKey,
    pub kind: MutationKind,
}

/// In-memory implementation of the DOM capability traits.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    /// Attached nodes in document order.
    order: Vec<NodeKey>,
    viewport_height: f64,
    mutations: Vec<Mutation>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Append `node` at the end of the document. Setup only; not logged.
    pub fn append(&mut self, node: MemoryNode) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        self.nodes.push(node);
        self.order.push(key);
        key
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Node data, including for detached nodes.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&MemoryNode> {
        self.nodes.get(key.0)
    }

    /// Mutable node data for test setup (e.g. changing a measurement). Not logged.
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(key.0)
    }

    #[must_use]
    pub fn is_attached(&self, key: NodeKey) -> bool {
        self.order.contains(&key)
    }

    /// Next attached node after `key` in document order.
    #[must_use]
    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let pos = self.position(key)?;
        self.order.get(pos + 1).copied()
    }

    /// Attached nodes in document order.
    pub fn attached(&self) -> impl Iterator<Item = (NodeKey, &MemoryNode)> + '_ {
        self.order.iter().map(|&key| (key, &self.nodes[key.0]))
    }

    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    fn position(&self, key: NodeKey) -> Option<usize> {
        self.order.iter().position(|&k| k == key)
    }

    fn attached_mut(&mut self, key: NodeKey) -> Result<&mut MemoryNode, DomError> {
        if !self.is_attached(key) {
            return Err(DomError::Host(format!("node {} is detached", key.0)));
        }
        Ok(&mut self.nodes[key.0])
    }

    fn log(&mut self, node: NodeKey, kind: MutationKind) {
        self.mutations.push(Mutation { node, kind });
    }
}

impl ElementLookup for MemoryDocument {
    type Handle = NodeKey;

    fn find(&self, locator: &Locator) -> Option<NodeKey> {
        self.attached()
            .find(|(_, node)| node.matches(locator))
            .map(|(key, _)| key)
    }

    /// Blank selectors are rejected, as `querySelector("")` throws.
    fn try_find(&self, locator: &Locator) -> Result<Option<NodeKey>, DomError> {
        if let Locator::Query(selector) = locator
            && selector.trim().is_empty()
        {
            return Err(DomError::Host(format!("invalid selector {selector:?}")));
        }
        Ok(self.find(locator))
    }

    fn find_all(&self, locator: &Locator) -> Vec<NodeKey> {
        self.attached()
            .filter(|(_, node)| node.matches(locator))
            .map(|(key, _)| key)
            .collect()
    }

    fn offset_height(&self, element: &NodeKey) -> f64 {
        self.node(*element).map_or(0.0, |node| node.offset_height)
    }

    fn margin_bottom(&self, element: &NodeKey) -> f64 {
        self.node(*element).map_or(0.0, |node| node.margin_bottom)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

impl ElementMutator for MemoryDocument {
    fn set_style(
        &mut self,
        element: &NodeKey,
        property: StyleProperty,
        value: &str,
    ) -> Result<(), DomError> {
        self.attached_mut(*element)?
            .styles
            .insert(property, value.to_owned());
        self.log(*element, MutationKind::SetStyle(property, value.to_owned()));
        Ok(())
    }

    fn remove_style(&mut self, element: &NodeKey, property: StyleProperty) -> Result<(), DomError> {
        self.attached_mut(*element)?.styles.remove(&property);
        self.log(*element, MutationKind::RemoveStyle(property));
        Ok(())
    }

    fn add_class(&mut self, element: &NodeKey, class: &str) -> Result<(), DomError> {
        self.attached_mut(*element)?.classes.insert(class.to_owned());
        self.log(*element, MutationKind::AddClass(class.to_owned()));
        Ok(())
    }

    fn remove_class(&mut self, element: &NodeKey, class: &str) -> Result<(), DomError> {
        self.attached_mut(*element)?.classes.remove(class);
        self.log(*element, MutationKind::RemoveClass(class.to_owned()));
        Ok(())
    }

    fn set_text_content(&mut self, element: &NodeKey, text: &str) -> Result<(), DomError> {
        let node = self.attached_mut(*element)?;
        node.text = text.to_owned();
        node.raw_markup = false;
        self.log(*element, MutationKind::SetText(text.to_owned()));
        Ok(())
    }

    fn set_value(&mut self, element: &NodeKey, value: &str) -> Result<(), DomError> {
        self.attached_mut(*element)?.value = value.to_owned();
        self.log(*element, MutationKind::SetValue(value.to_owned()));
        Ok(())
    }

    fn insert_after(&mut self, anchor: &NodeKey, node: NewNode) -> Result<NodeKey, DomError> {
        let pos = self
            .position(*anchor)
            .ok_or_else(|| DomError::Host(format!("anchor node {} is detached", anchor.0)))?;
        let (text, raw_markup) = match node.content {
            NodeContent::Text(text) => (text, false),
            NodeContent::Markup(markup) => (markup, true),
        };
        let key = NodeKey(self.nodes.len());
        self.nodes.push(MemoryNode {
            tag: node.tag,
            id: Some(node.id),
            classes: node.classes.into_iter().collect(),
            text,
            raw_markup,
            ..MemoryNode::default()
        });
        self.order.insert(pos + 1, key);
        self.log(key, MutationKind::Inserted { after: *anchor });
        Ok(key)
    }

    fn remove(&mut self, element: &NodeKey) -> Result<(), DomError> {
        let pos = self
            .position(*element)
            .ok_or_else(|| DomError::Host(format!("node {} is detached", element.0)))?;
        self.order.remove(pos);
        self.log(*element, MutationKind::Removed);
        Ok(())
    }
}
