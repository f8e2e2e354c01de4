//! Recursive descent parser for Vue single-file components.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::{ParseOptions, ParseResult, Span};
use smol_str::SmolStr;
use text_size::TextSize;

/// HTML void elements that are self-closing and should not have closing tags.
/// See: https://developer.mozilla.org/en-US/docs/Glossary/Void_element
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_lowercase().as_str())
}

/// The SFC parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// Parser options.
    options: ParseOptions,
    /// Names of the elements currently open, outermost first.
    open_tags: Vec<SmolStr>,
    /// EOF token for when we're past the end
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            options,
            open_tags: Vec::new(),
            eof_token,
        }
    }

    /// Parses the source into an SFC document.
    pub fn parse(mut self) -> ParseResult {
        let document = self.parse_document();
        ParseResult {
            document,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_text(&self) -> &'src str {
        self.current().span.slice(self.source)
    }

    fn peek(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof_token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be the given kind, reports error if not.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self.current_kind();
        if found == TokenKind::Eof {
            self.error(ParseErrorKind::UnexpectedEof {
                expected: kind.name().to_string(),
            });
        } else {
            self.error(ParseErrorKind::UnexpectedToken {
                expected: kind.name().to_string(),
                found: found.name().to_string(),
            });
        }
        false
    }

    fn error(&mut self, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(kind, self.current().span));
    }

    /// The end offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| u32::from(t.span.end) as usize)
            .unwrap_or(0)
    }

    /// Skips every token that starts before `offset`.
    fn skip_to(&mut self, offset: usize) {
        while (u32::from(self.current().span.start) as usize) < offset
            && !self.check(TokenKind::Eof)
        {
            self.advance();
        }
    }

    /// Reads raw source from `start` up to the first occurrence of `delimiter`
    /// (or the end of input) and positions the token cursor on the delimiter.
    fn read_raw_until(&mut self, start: usize, delimiter: &str) -> (String, Span) {
        let start = start.min(self.source.len());
        let remaining = &self.source[start..];
        let end = start + remaining.find(delimiter).unwrap_or(remaining.len());
        self.skip_to(end);
        (
            self.source[start..end].to_string(),
            Span::new(TextSize::from(start as u32), TextSize::from(end as u32)),
        )
    }

    /// Finds the end of a text run starting at `start`: the next `<` that opens
    /// a tag or comment, ignoring anything inside `{{ }}`.
    fn scan_text_end(&self, start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut i = start;
        let mut in_interpolation = false;

        while i < bytes.len() {
            if in_interpolation {
                if bytes[i] == b'}' && bytes.get(i + 1) == Some(&b'}') {
                    in_interpolation = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            if bytes[i] == b'{' && bytes.get(i + 1) == Some(&b'{') {
                in_interpolation = true;
                i += 2;
                continue;
            }

            if bytes[i] == b'<' {
                if let Some(next) = bytes.get(i + 1) {
                    if next.is_ascii_alphabetic() || *next == b'/' || *next == b'!' {
                        break;
                    }
                }
            }
            i += 1;
        }

        i.min(bytes.len())
    }

    // === Parsing methods ===

    /// Parses a complete SFC document.
    fn parse_document(&mut self) -> SfcDocument {
        let mut doc = SfcDocument::default();

        while !self.check(TokenKind::Eof) {
            match self.current_kind() {
                TokenKind::CommentOpen => {
                    self.parse_comment();
                }
                TokenKind::LAngle if self.peek(1).kind == TokenKind::Name => {
                    let tag = self.peek(1).span.slice(self.source);
                    match tag {
                        "template" => {
                            if let Some(template) = self.parse_element() {
                                if doc.template.is_none() {
                                    doc.template = Some(template);
                                }
                            }
                        }
                        "script" => {
                            if let Some(script) = self.parse_script() {
                                if script.setup {
                                    doc.script_setup = Some(script);
                                } else {
                                    doc.script = Some(script);
                                }
                            }
                        }
                        "style" => {
                            if let Some(style) = self.parse_style() {
                                doc.styles.push(style);
                            }
                        }
                        _ => {
                            // Custom blocks (`<i18n>`, `<docs>`) are skipped.
                            self.parse_raw_block();
                        }
                    }
                }
                _ => self.advance(),
            }
        }

        doc.span = Span::new(
            TextSize::from(0),
            TextSize::from(self.source.len() as u32),
        );
        doc
    }

    /// Parses `<!-- ... -->` starting at the `<!--` token.
    fn parse_comment(&mut self) -> Comment {
        let start = self.current().span.start;
        let content_start = u32::from(self.current().span.end) as usize;
        self.advance();

        let (data, _) = self.read_raw_until(content_start, "-->");
        let end = (content_start + data.len() + 3).min(self.source.len());
        if content_start + data.len() >= self.source.len() {
            self.error(ParseErrorKind::UnexpectedEof {
                expected: "'-->'".to_string(),
            });
        }
        self.skip_to(end);

        Comment {
            span: Span::new(start, TextSize::from(end as u32)),
            data,
        }
    }

    /// Parses the attributes of an opening tag, stopping at `>` or `/>`.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::Name => {}
                // Stray `/` as in `<br / >`
                TokenKind::Slash => {
                    self.advance();
                    continue;
                }
                _ => break,
            }

            let attr_start = self.current().span.start;
            let name = SmolStr::new(self.current_text());
            self.advance();

            let value = if self.eat(TokenKind::Eq) {
                self.parse_attribute_value()
            } else {
                None
            };

            let attr_end = TextSize::from(self.prev_end() as u32);
            if attributes.iter().any(|a| a.name == name) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::DuplicateAttribute {
                        name: name.to_string(),
                    },
                    Span::new(attr_start, attr_end),
                ));
                continue;
            }

            attributes.push(Attribute {
                span: Span::new(attr_start, attr_end),
                name,
                value,
            });
        }

        attributes
    }

    fn parse_attribute_value(&mut self) -> Option<String> {
        for (quote, delimiter) in [(TokenKind::DoubleQuote, "\""), (TokenKind::SingleQuote, "'")] {
            if self.eat(quote) {
                let start = self.prev_end();
                let (text, _) = self.read_raw_until(start, delimiter);
                self.expect(quote);
                return Some(text);
            }
        }

        if self.check(TokenKind::Name) {
            let text = self.current_text().to_string();
            self.advance();
            return Some(text);
        }

        self.error(ParseErrorKind::UnexpectedToken {
            expected: "attribute value".to_string(),
            found: self.current_kind().name().to_string(),
        });
        None
    }

    /// Parses an element and, recursively, its children.
    fn parse_element(&mut self) -> Option<Element> {
        let start = self.current().span.start;
        if !self.expect(TokenKind::LAngle) {
            return None;
        }

        if !self.check(TokenKind::Name) {
            self.error(ParseErrorKind::InvalidTagName {
                name: self.current_text().to_string(),
            });
            return None;
        }
        let name = SmolStr::new(self.current_text());
        self.advance();

        let attributes = self.parse_attributes();

        let mut element = Element {
            span: Span::new(start, start),
            name,
            attributes,
            children: Vec::new(),
            self_closing: false,
        };

        if self.eat(TokenKind::SlashRAngle) {
            element.self_closing = true;
        } else if self.expect(TokenKind::RAngle) {
            if !is_void_element(&element.name) {
                self.open_tags.push(element.name.clone());
                element.children = self.parse_children(&element.name);
                self.open_tags.pop();
            }
        }

        element.span = Span::new(start, TextSize::from(self.prev_end() as u32));
        Some(element)
    }

    /// Parses child nodes until the closing tag of `parent`.
    fn parse_children(&mut self, parent: &SmolStr) -> Vec<Node> {
        let mut children = Vec::new();

        loop {
            let text_start = self.prev_end();
            let text_end = self.scan_text_end(text_start);
            if text_end > text_start {
                self.skip_to(text_end);
                children.push(Node::Text(Text {
                    span: Span::new(
                        TextSize::from(text_start as u32),
                        TextSize::from(text_end as u32),
                    ),
                    value: self.source[text_start..text_end].to_string(),
                }));
            }

            match self.current_kind() {
                TokenKind::Eof => {
                    self.error(ParseErrorKind::UnclosedTag {
                        tag_name: parent.to_string(),
                    });
                    break;
                }
                TokenKind::CommentOpen => {
                    let comment = self.parse_comment();
                    children.push(Node::Comment(comment));
                }
                TokenKind::LAngleSlash => {
                    let closing_kind = self.peek(1).kind;
                    let closing_name = if closing_kind == TokenKind::Name {
                        self.peek(1).span.slice(self.source)
                    } else {
                        ""
                    };

                    if closing_name == parent.as_str() {
                        self.advance();
                        self.advance();
                        self.expect(TokenKind::RAngle);
                        break;
                    }

                    if self.open_tags.iter().any(|t| t == closing_name) {
                        // Closes an ancestor: this element was left open.
                        self.error(ParseErrorKind::UnclosedTag {
                            tag_name: parent.to_string(),
                        });
                        break;
                    }

                    self.error(ParseErrorKind::MismatchedClosingTag {
                        expected: parent.to_string(),
                        found: closing_name.to_string(),
                    });
                    self.advance();
                    if closing_kind == TokenKind::Name {
                        self.advance();
                    }
                    self.eat(TokenKind::RAngle);
                }
                TokenKind::LAngle => match self.parse_element() {
                    Some(child) => children.push(Node::Element(child)),
                    None => self.advance(),
                },
                _ => self.advance(),
            }
        }

        children
    }

    /// Parses the opening tag of a raw-text block and reads its content up to
    /// the matching closing tag. Returns the tag name, attributes, content, and
    /// the spans of the whole block and the content.
    fn parse_raw_block(&mut self) -> Option<(SmolStr, Vec<Attribute>, String, Span, Span)> {
        let start = self.current().span.start;
        if !self.expect(TokenKind::LAngle) || !self.check(TokenKind::Name) {
            return None;
        }
        let name = SmolStr::new(self.current_text());
        self.advance();

        let attributes = self.parse_attributes();

        if self.eat(TokenKind::SlashRAngle) {
            let end = TextSize::from(self.prev_end() as u32);
            return Some((
                name,
                attributes,
                String::new(),
                Span::new(start, end),
                Span::empty(end),
            ));
        }
        self.expect(TokenKind::RAngle);

        let content_start = self.prev_end();
        let closing = format!("</{}", name);
        let (content, content_span) = self.read_raw_until(content_start, &closing);

        if self.eat(TokenKind::LAngleSlash) {
            self.eat(TokenKind::Name);
            self.expect(TokenKind::RAngle);
        } else {
            self.error(ParseErrorKind::UnclosedTag {
                tag_name: name.to_string(),
            });
        }

        let end = TextSize::from(self.prev_end() as u32);
        Some((name, attributes, content, Span::new(start, end), content_span))
    }

    /// Parses a `<script>` block.
    fn parse_script(&mut self) -> Option<ScriptBlock> {
        let (_, attributes, content, span, content_span) = self.parse_raw_block()?;

        let lang = match attributes.iter().find(|a| a.name == "lang") {
            Some(a) if matches!(a.value_str(), "ts" | "tsx" | "typescript") => ScriptLang::TypeScript,
            _ => ScriptLang::JavaScript,
        };
        let setup = attributes.iter().any(|a| a.name == "setup");
        let content = content.replace('\t', &" ".repeat(self.options.tab_width));

        Some(ScriptBlock {
            span,
            content_span,
            content,
            lang,
            setup,
            attributes,
        })
    }

    /// Parses a `<style>` block.
    fn parse_style(&mut self) -> Option<StyleBlock> {
        let (_, attributes, content, span, _) = self.parse_raw_block()?;

        let lang = attributes
            .iter()
            .find(|a| a.name == "lang")
            .and_then(|a| a.value.as_deref())
            .map(SmolStr::new);

        Some(StyleBlock {
            span,
            content,
            lang,
            scoped: attributes.iter().any(|a| a.name == "scoped"),
            module: attributes.iter().any(|a| a.name == "module"),
        })
    }
}
