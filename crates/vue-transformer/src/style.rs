//! Stylesheet derivation.
//!
//! Every `<style>` block of a component is concatenated into one stylesheet
//! that the generated component imports.

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use thiserror::Error;
use vue_parser::StyleBlock;

/// Errors produced by a [`StylePreprocessor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("failed to preprocess `{lang}` stylesheet: {message}")]
    Preprocess { lang: String, message: String },
}

/// Converts stylesheet source into the stylesheet that is written out.
pub trait StylePreprocessor: Send + Sync {
    /// Processes `source` written in `lang` (`None` for plain CSS).
    fn process(&self, source: &str, lang: Option<&str>) -> Result<String, StyleError>;

    /// The extension of the produced stylesheet.
    fn extension(&self, lang: Option<&str>) -> String;
}

/// Keeps the stylesheet in its source language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl StylePreprocessor for Passthrough {
    fn process(&self, source: &str, _lang: Option<&str>) -> Result<String, StyleError> {
        Ok(source.to_string())
    }

    fn extension(&self, lang: Option<&str>) -> String {
        match lang {
            None | Some("") | Some("css") => "css".to_string(),
            Some(lang) => lang.to_string(),
        }
    }
}

/// The derived stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// File name next to the generated component (`styles.scss`).
    pub file_name: String,
    pub content: String,
}

/// Concatenates the style blocks and runs them through `preprocessor`.
///
/// The language of the first block decides the stylesheet language.
pub fn derive_stylesheet(
    styles: &[StyleBlock],
    base_name: &str,
    preprocessor: &dyn StylePreprocessor,
) -> Result<(Stylesheet, Vec<Diagnostic>), StyleError> {
    let mut diagnostics = Vec::new();
    for block in styles {
        if block.scoped {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::ScopedStyle,
                    "`scoped` styles are emitted unscoped",
                )
                .with_span(block.span),
            );
        }
        if block.module {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::ScopedStyle,
                    "CSS module styles are emitted as a global stylesheet",
                )
                .with_span(block.span),
            );
        }
    }

    let lang = styles.first().and_then(|b| b.lang.as_deref());
    if let Some(other) = styles
        .iter()
        .map(|b| b.lang.as_deref())
        .find(|l| *l != lang)
    {
        diagnostics.push(Diagnostic::new(
            DiagnosticCode::ScopedStyle,
            format!(
                "style blocks mix languages; `{}` blocks are concatenated as `{}`",
                other.unwrap_or("css"),
                lang.unwrap_or("css")
            ),
        ));
    }

    let source = styles
        .iter()
        .map(|b| b.content.trim_matches('\n'))
        .filter(|c| !c.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut content = preprocessor.process(&source, lang)?;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }

    Ok((
        Stylesheet {
            file_name: format!("{}.{}", base_name, preprocessor.extension(lang)),
            content,
        },
        diagnostics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styles(source: &str) -> Vec<StyleBlock> {
        vue_parser::parse(source).document.styles
    }

    #[test]
    fn test_blocks_are_concatenated() {
        let blocks = styles(
            "<style lang=\"scss\">\n.a { color: red; }\n</style>\n<style lang=\"scss\" scoped>\n.b { color: blue; }\n</style>",
        );
        let (sheet, diagnostics) =
            derive_stylesheet(&blocks, "styles", &Passthrough).expect("stylesheet");
        assert_eq!(sheet.file_name, "styles.scss");
        assert_eq!(sheet.content, ".a { color: red; }\n\n.b { color: blue; }\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::ScopedStyle);
    }

    #[test]
    fn test_no_styles() {
        let (sheet, diagnostics) = derive_stylesheet(&[], "styles", &Passthrough).expect("stylesheet");
        assert_eq!(sheet.file_name, "styles.css");
        assert_eq!(sheet.content, "");
        assert!(diagnostics.is_empty());
    }

    struct Failing;

    impl StylePreprocessor for Failing {
        fn process(&self, _source: &str, lang: Option<&str>) -> Result<String, StyleError> {
            Err(StyleError::Preprocess {
                lang: lang.unwrap_or("css").to_string(),
                message: "boom".to_string(),
            })
        }

        fn extension(&self, _lang: Option<&str>) -> String {
            "css".to_string()
        }
    }

    #[test]
    fn test_preprocessor_errors_propagate() {
        let blocks = styles("<style lang=\"less\">a {}</style>");
        let err = derive_stylesheet(&blocks, "styles", &Failing).expect_err("should fail");
        assert_eq!(err.to_string(), "failed to preprocess `less` stylesheet: boom");
    }
}
