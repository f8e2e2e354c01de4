//! AST types for Vue single-file components.
//!
//! The document is split into its top-level blocks: one `<template>` tree,
//! the option-object `<script>`, an optional `<script setup>`, and any number
//! of `<style>` blocks.

use crate::Span;
use smol_str::SmolStr;

/// A complete `.vue` document.
#[derive(Debug, Clone, Default)]
pub struct SfcDocument {
    /// The root `<template>` element, including the wrapper tag itself.
    pub template: Option<Element>,
    /// The option-object script (`<script>`).
    pub script: Option<ScriptBlock>,
    /// The setup-style script (`<script setup>`).
    pub script_setup: Option<ScriptBlock>,
    /// All `<style>` blocks in document order.
    pub styles: Vec<StyleBlock>,
    /// The span of the entire document.
    pub span: Span,
}

/// A script block.
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    /// The span of the entire script block including tags.
    pub span: Span,
    /// The span of just the script content.
    pub content_span: Span,
    /// The script content, with tabs expanded to two spaces.
    pub content: String,
    /// The script language.
    pub lang: ScriptLang,
    /// Whether the block carries the `setup` attribute.
    pub setup: bool,
    /// Attributes on the script tag.
    pub attributes: Vec<Attribute>,
}

/// The language of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptLang {
    /// JavaScript (default).
    #[default]
    JavaScript,
    /// TypeScript.
    TypeScript,
}

/// A style block.
#[derive(Debug, Clone)]
pub struct StyleBlock {
    /// The span of the entire style block including tags.
    pub span: Span,
    /// The raw stylesheet content.
    pub content: String,
    /// The `lang` attribute (`scss`, `sass`, `less`, ...), if present.
    pub lang: Option<SmolStr>,
    /// Whether the block is `scoped`.
    pub scoped: bool,
    /// Whether the block is a CSS module (`module`).
    pub module: bool,
}

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A tag with attributes and children.
    Element(Element),
    /// Raw text, including any `{{ }}` interpolations.
    Text(Text),
    /// An HTML comment.
    Comment(Comment),
}

impl Node {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Element(n) => n.span,
            Node::Text(n) => n.span,
            Node::Comment(n) => n.span,
        }
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns true for text nodes that contain only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.value.trim().is_empty())
    }
}

/// A tag node.
#[derive(Debug, Clone)]
pub struct Element {
    /// The span of the element, from `<` to the end of its closing tag.
    pub span: Span,
    /// The tag name as written.
    pub name: SmolStr,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes in source order.
    pub children: Vec<Node>,
    /// Whether the element was written as `<tag />`.
    pub self_closing: bool,
}

impl Element {
    /// Looks up an attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns true if the element carries the named attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns true if the tag name contains a `-` separator.
    pub fn is_custom(&self) -> bool {
        self.name.contains('-')
    }
}

/// An attribute on a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The span of the attribute.
    pub span: Span,
    /// The attribute name including any directive sigil (`:`, `@`, `v-`).
    pub name: SmolStr,
    /// The unquoted value, or `None` for a bare attribute.
    pub value: Option<String>,
}

impl Attribute {
    /// Returns the value, or an empty string for a bare attribute.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Text content.
#[derive(Debug, Clone)]
pub struct Text {
    /// The span of the text.
    pub span: Span,
    /// The raw text.
    pub value: String,
}

/// An HTML comment.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The span of the comment.
    pub span: Span,
    /// The comment content (without `<!--` and `-->`).
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(name: &str, attributes: &[(&str, Option<&str>)]) -> Element {
        Element {
            span: Span::default(),
            name: SmolStr::new(name),
            attributes: attributes
                .iter()
                .map(|(n, v)| Attribute {
                    span: Span::default(),
                    name: SmolStr::new(n),
                    value: v.map(str::to_string),
                })
                .collect(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    #[test]
    fn test_attribute_lookup() {
        let el = element("div", &[("v-if", Some("open")), ("disabled", None)]);
        assert_eq!(el.attribute("v-if").map(|a| a.value_str()), Some("open"));
        assert_eq!(el.attribute("disabled").map(|a| a.value_str()), Some(""));
        assert!(!el.has_attribute("v-else"));
    }

    #[test]
    fn test_custom_element() {
        assert!(element("my-widget", &[]).is_custom());
        assert!(!element("div", &[]).is_custom());
    }

    #[test]
    fn test_blank_text() {
        let blank = Node::Text(Text {
            span: Span::default(),
            value: "\n   ".to_string(),
        });
        assert!(blank.is_blank_text());
    }
}
