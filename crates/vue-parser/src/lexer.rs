//! SFC lexer using logos.
//!
//! The lexer only recognises markup punctuation and name-like runs. Text
//! content, attribute values and block contents are read by the parser as raw
//! source slices between token offsets, so the token set stays small.

use crate::Span;
use logos::Logos;
use text_size::TextSize;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for SFC markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    /// `<!--`
    #[token("<!--", priority = 12)]
    CommentOpen,

    /// `</`
    #[token("</", priority = 11)]
    LAngleSlash,

    /// `<`
    #[token("<", priority = 10)]
    LAngle,

    /// `/>`
    #[token("/>", priority = 11)]
    SlashRAngle,

    /// `>`
    #[token(">", priority = 10)]
    RAngle,

    /// `/`
    #[token("/", priority = 10)]
    Slash,

    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `"`
    #[token("\"", priority = 10)]
    DoubleQuote,

    /// `'`
    #[token("'", priority = 10)]
    SingleQuote,

    /// A tag name, attribute name (with any directive sigil), unquoted value
    /// or a run of text.
    #[regex(r#"[^ \t\r\n\f"'<>/=]+"#, priority = 4)]
    Name,

    /// End of file
    Eof,

    /// Invalid/unknown token
    #[default]
    Error,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::CommentOpen => "'<!--'",
            TokenKind::LAngleSlash => "'</'",
            TokenKind::LAngle => "'<'",
            TokenKind::SlashRAngle => "'/>'",
            TokenKind::RAngle => "'>'",
            TokenKind::Slash => "'/'",
            TokenKind::Eq => "'='",
            TokenKind::DoubleQuote => "'\"'",
            TokenKind::SingleQuote => "'''",
            TokenKind::Name => "name",
            TokenKind::Eof => "end of file",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A lexer for `.vue` source code.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    /// Returns the text of the current token.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let kind = match self.inner.next() {
            Some(Ok(kind)) => kind,
            Some(Err(())) => TokenKind::Error,
            None => {
                self.finished = true;
                let end = TextSize::from(self.source.len() as u32);
                return Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::empty(end),
                });
            }
        };

        let span = self.inner.span();
        Some(Token {
            kind,
            span: Span::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        })
    }
}
