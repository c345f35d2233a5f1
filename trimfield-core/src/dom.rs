//! A minimal document model for the fields the cleaner attaches to.
//!
//! Only what the content session needs is modelled: element identity, tag
//! name, attributes and children. Trees deserialize from JSON so that page
//! snapshots and mutation batches can be replayed from files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identity of an element within one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: u64, tag: &str) -> Self {
        Self {
            id: ElementId(id),
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(el.children.iter().rev());
        }
        out
    }
}

/// The kind of editable field an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `<input>` or `<textarea>`: has a value and a selection.
    TextControl,
    /// A `contenteditable="true"` region.
    Editable,
}

/// Recognises the text-like fields the cleaner attaches to:
/// `input[type=text|search|url|tel|email]`, `input` without a type,
/// `textarea` and `[contenteditable='true']`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSelector;

const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "url", "tel", "email"];

impl FieldSelector {
    pub fn kind_of(&self, el: &Element) -> Option<FieldKind> {
        if el.tag.eq_ignore_ascii_case("input") {
            let text_like = match el.attr("type") {
                None => true,
                Some(t) => TEXT_INPUT_TYPES.iter().any(|known| t.eq_ignore_ascii_case(known)),
            };
            if text_like {
                return Some(FieldKind::TextControl);
            }
        }
        if el.tag.eq_ignore_ascii_case("textarea") {
            return Some(FieldKind::TextControl);
        }
        if el.attr("contenteditable") == Some("true") {
            return Some(FieldKind::Editable);
        }
        None
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.kind_of(el).is_some()
    }

    /// The root itself (if it matches) followed by every matching descendant.
    pub fn fields_in<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        std::iter::once(root)
            .chain(root.descendants())
            .filter(|el| self.matches(el))
            .collect()
    }
}
