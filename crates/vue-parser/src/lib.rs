//! Vue single-file component parser for vue-to-react.
//!
//! This crate splits a `.vue` document into its blocks and parses the
//! `<template>` markup into a tree:
//! - Lexer (tokenizer) using `logos`
//! - Recursive descent parser over tokens, with raw slicing for text,
//!   attribute values and block contents
//! - AST types for elements, text, comments and blocks
//! - Error recovery for partial parsing
//!
//! # Example
//!
//! ```
//! use vue_parser::parse;
//!
//! let source = r#"
//! <template>
//!   <button @click="increment">Count: {{ count }}</button>
//! </template>
//!
//! <script>
//! export default { data() { return { count: 0 } } }
//! </script>
//! "#;
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert!(result.document.template.is_some());
//! ```

mod ast;
mod error;
mod lexer;
mod parser;
mod span;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use span::{LineCol, LineIndex, Span};

/// Options for parsing `.vue` files.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Number of spaces each tab in a script block expands to.
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { tab_width: 2 }
    }
}

/// The result of parsing a `.vue` file.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document.
    pub document: SfcDocument,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a `.vue` source file.
///
/// Parsing recovers from errors where possible, returning both the document
/// and any errors encountered.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a `.vue` source file with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    parser::Parser::new(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.template.is_none());
        assert!(result.document.script.is_none());
    }

    #[test]
    fn test_parse_template_only() {
        let result = parse("<template><div>hello</div></template>");
        assert!(result.errors.is_empty());
        let template = result.document.template.expect("template");
        assert_eq!(template.name, "template");
        assert_eq!(template.children.len(), 1);
    }

    #[test]
    fn test_custom_tab_width() {
        let result = parse_with_options(
            "<script>\tx</script>",
            ParseOptions { tab_width: 4 },
        );
        assert_eq!(
            result.document.script.map(|s| s.content),
            Some("    x".to_string())
        );
    }

    #[test]
    fn test_custom_blocks_are_skipped() {
        let result = parse("<i18n>{ \"en\": {} }</i18n><template><p/></template>");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(result.document.template.is_some());
    }
}
