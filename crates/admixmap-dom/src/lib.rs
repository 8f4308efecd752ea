#![forbid(unsafe_code)]

//! DOM capability layer for the admixture map UI.
//!
//! The UI components never touch a global document. Instead they receive a
//! value implementing [`ElementLookup`] (reads) and [`ElementMutator`]
//! (writes). Two implementations exist:
//!
//! - `WebDocument` in `admixmap-web`, backed by `web-sys` (wasm32 only).
//! - [`MemoryDocument`], an in-memory tree for tests and native hosts.
//!
//! Elements are addressed through a [`Locator`], which names an element by id,
//! by class, or (for hosts with legacy markup) by a CSS selector.

pub mod css;
pub mod memory;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use memory::{MemoryDocument, MemoryNode, Mutation, MutationKind, NodeKey};

/// Stable address of one or more elements in the host markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    /// Element with this `id` attribute.
    Id(String),
    /// Elements carrying this class. Single lookups take the first match in
    /// document order.
    Class(String),
    /// Arbitrary CSS selector.
    Query(String),
}

impl Locator {
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    #[must_use]
    pub fn query(selector: impl Into<String>) -> Self {
        Self::Query(selector.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Query(selector) => f.write_str(selector),
        }
    }
}

/// Inline style properties this layer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    BorderColor,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    Height,
    Display,
}

impl StyleProperty {
    /// CSS property name as accepted by `CSSStyleDeclaration.setProperty`.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::BorderColor => "border-color",
            Self::BorderTopRightRadius => "border-top-right-radius",
            Self::BorderBottomRightRadius => "border-bottom-right-radius",
            Self::Height => "height",
            Self::Display => "display",
        }
    }
}

/// Content of a newly inserted node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Inserted as a text node; never interpreted as markup.
    Text(String),
    /// Inserted as raw HTML.
    Markup(String),
}

/// Description of an element to create with [`ElementMutator::insert_after`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub content: NodeContent,
}

/// DOM access failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A referenced element is absent from the host markup.
    ElementNotFound(Locator),
    /// The host rejected a DOM call.
    Host(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementNotFound(locator) => write!(f, "element not found: {locator}"),
            Self::Host(msg) => write!(f, "host DOM error: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Read access to the host document.
pub trait ElementLookup {
    /// Opaque element reference.
    type Handle: Clone;

    /// First element matching `locator`, if any.
    fn find(&self, locator: &Locator) -> Option<Self::Handle>;

    /// Every element matching `locator`, in document order.
    fn find_all(&self, locator: &Locator) -> Vec<Self::Handle>;

    /// Rendered height of `element` in pixels (`offsetHeight`).
    fn offset_height(&self, element: &Self::Handle) -> f64;

    /// Computed `margin-bottom` of `element` in whole pixels.
    fn margin_bottom(&self, element: &Self::Handle) -> f64;

    /// Current viewport height (`window.innerHeight`).
    fn viewport_height(&self) -> f64;

    /// Like [`find`](Self::find), but a locator the host rejects (an invalid
    /// selector) is a [`DomError::Host`] instead of a miss.
    fn try_find(&self, locator: &Locator) -> Result<Option<Self::Handle>, DomError> {
        Ok(self.find(locator))
    }

    /// Like [`try_find`](Self::try_find), but absence is an error.
    fn require(&self, locator: &Locator) -> Result<Self::Handle, DomError> {
        self.try_find(locator)?
            .ok_or_else(|| DomError::ElementNotFound(locator.clone()))
    }
}

/// Write access to the host document.
pub trait ElementMutator: ElementLookup {
    fn set_style(
        &mut self,
        element: &Self::Handle,
        property: StyleProperty,
        value: &str,
    ) -> Result<(), DomError>;

    fn remove_style(
        &mut self,
        element: &Self::Handle,
        property: StyleProperty,
    ) -> Result<(), DomError>;

    fn add_class(&mut self, element: &Self::Handle, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, element: &Self::Handle, class: &str) -> Result<(), DomError>;

    /// Replace all content of `element` with `text`.
    fn set_text_content(&mut self, element: &Self::Handle, text: &str) -> Result<(), DomError>;

    /// Set the form value of `element`.
    fn set_value(&mut self, element: &Self::Handle, value: &str) -> Result<(), DomError>;

    /// Create `node` and insert it as the next sibling of `anchor`.
    fn insert_after(
        &mut self,
        anchor: &Self::Handle,
        node: NewNode,
    ) -> Result<Self::Handle, DomError>;

    /// Detach `element` from the document.
    fn remove(&mut self, element: &Self::Handle) -> Result<(), DomError>;
}
