#![forbid(unsafe_code)]

//! `web-sys` implementation of the DOM capability traits.

use admixmap_dom::css::parse_px;
use admixmap_dom::{
    DomError, ElementLookup, ElementMutator, Locator, NewNode, NodeContent, StyleProperty,
};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Window};

/// The live page.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    pub fn new(window: Window) -> Result<Self, DomError> {
        let document = window
            .document()
            .ok_or_else(|| DomError::Host("window has no document".to_owned()))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Attribute on `<body>`, if the body exists and carries it.
    #[must_use]
    pub fn body_attribute(&self, name: &str) -> Option<String> {
        self.document.body()?.get_attribute(name)
    }
}

pub(crate) fn host_error(err: JsValue) -> DomError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    DomError::Host(message)
}

fn html(element: &Element) -> Result<&HtmlElement, DomError> {
    element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| DomError::Host(format!("<{}> is not an HTML element", element.tag_name())))
}

/// `[id="..."]`, which matches every element carrying a duplicated id.
fn id_selector(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 6);
    out.push_str("[id=\"");
    for ch in id.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push_str("\"]");
    out
}

impl ElementLookup for WebDocument {
    type Handle = Element;

    fn find(&self, locator: &Locator) -> Option<Element> {
        match locator {
            Locator::Id(id) => self.document.get_element_by_id(id),
            Locator::Class(class) => self.document.get_elements_by_class_name(class).item(0),
            Locator::Query(_) => self.try_find(locator).unwrap_or_else(|err| {
                warn!(%locator, %err, "selector rejected");
                None
            }),
        }
    }

    fn try_find(&self, locator: &Locator) -> Result<Option<Element>, DomError> {
        match locator {
            Locator::Query(query) => self.document.query_selector(query).map_err(host_error),
            _ => Ok(self.find(locator)),
        }
    }

    fn find_all(&self, locator: &Locator) -> Vec<Element> {
        if let Locator::Class(class) = locator {
            // Live collection; snapshot it before callers mutate classes.
            let list = self.document.get_elements_by_class_name(class);
            return (0..list.length()).filter_map(|i| list.item(i)).collect();
        }
        let selector = match locator {
            Locator::Id(id) => id_selector(id),
            Locator::Query(query) => query.clone(),
            Locator::Class(_) => return Vec::new(),
        };
        let nodes = match self.document.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(%locator, err = %host_error(err), "selector rejected");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn offset_height(&self, handle: &Element) -> f64 {
        handle
            .dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn margin_bottom(&self, handle: &Element) -> f64 {
        self.window
            .get_computed_style(handle)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("margin-bottom").ok())
            .and_then(|value| parse_px(&value))
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}

impl ElementMutator for WebDocument {
    fn set_style(
        &mut self,
        handle: &Element,
        property: StyleProperty,
        value: &str,
    ) -> Result<(), DomError> {
        html(handle)?
            .style()
            .set_property(property.css_name(), value)
            .map_err(host_error)
    }

    fn remove_style(&mut self, handle: &Element, property: StyleProperty) -> Result<(), DomError> {
        html(handle)?
            .style()
            .remove_property(property.css_name())
            .map(drop)
            .map_err(host_error)
    }

    fn add_class(&mut self, handle: &Element, class: &str) -> Result<(), DomError> {
        handle.class_list().add_1(class).map_err(host_error)
    }

    fn remove_class(&mut self, handle: &Element, class: &str) -> Result<(), DomError> {
        handle.class_list().remove_1(class).map_err(host_error)
    }

    fn set_text_content(&mut self, handle: &Element, text: &str) -> Result<(), DomError> {
        handle.set_text_content(Some(text));
        Ok(())
    }

    fn set_value(&mut self, handle: &Element, value: &str) -> Result<(), DomError> {
        if let Some(input) = handle.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
            Ok(())
        } else if let Some(area) = handle.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
            Ok(())
        } else {
            handle.set_attribute("value", value).map_err(host_error)
        }
    }

    fn insert_after(&mut self, anchor: &Element, node: NewNode) -> Result<Element, DomError> {
        let element = self.document.create_element(&node.tag).map_err(host_error)?;
        if !node.id.is_empty() {
            element.set_id(&node.id);
        }
        if !node.classes.is_empty() {
            element.set_class_name(&node.classes.join(" "));
        }
        match &node.content {
            NodeContent::Text(text) => element.set_text_content(Some(text)),
            NodeContent::Markup(markup) => element.set_inner_html(markup),
        }
        anchor
            .insert_adjacent_element("afterend", &element)
            .map_err(host_error)?;
        Ok(element)
    }

    fn remove(&mut self, handle: &Element) -> Result<(), DomError> {
        handle.remove();
        Ok(())
    }
}
