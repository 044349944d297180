//! Tokenizer for the manifest grammar.
//!
//! Tokens carry byte spans into the source text so parse errors can
//! point at the offending statement. Newlines terminate statements at
//! the top level but are dropped inside parentheses, brackets, and
//! braces, so multi-line declarations tokenize the same as single-line
//! ones.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::dsl::errors::{ParseError, ParseErrorKind};

/// Byte range of a token in the manifest text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start,
            len: end.saturating_sub(start),
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len).into()
    }
}

/// Lexical token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier: statement names and `key:` style keys
    Ident(String),
    /// Quoted string literal, unescaped
    Str(String),
    /// `:symbol`
    Symbol(String),
    /// `true` / `false`
    Bool(bool),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    /// `=>`
    FatArrow,
    /// `:` separating a bare key from its value
    Colon,
    /// Statement terminator
    Newline,
    Eof,
}

impl TokenKind {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("`{}`", name),
            TokenKind::Str(_) => "a string literal".to_string(),
            TokenKind::Symbol(name) => format!("`:{}`", name),
            TokenKind::Bool(value) => format!("`{}`", value),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::FatArrow => "`=>`".to_string(),
            TokenKind::Colon => "`:`".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// One token with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize manifest text.
///
/// The returned sequence is never empty: it always ends with an
/// [`TokenKind::Eof`] token spanning the end of input.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    Lexer {
        src,
        chars: src.char_indices().peekable(),
        tokens: Vec::new(),
        depth: 0,
    }
    .run()
}

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    tokens: Vec<Token>,
    /// Nesting level of parens/brackets/braces; newlines are dropped
    /// when non-zero
    depth: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some((start, ch)) = self.chars.next() {
            match ch {
                ' ' | '\t' | '\r' => {}
                '\n' => {
                    if self.depth == 0 {
                        self.push(TokenKind::Newline, start, start + 1);
                    }
                }
                '#' => self.comment(),
                '(' => {
                    self.depth += 1;
                    self.push(TokenKind::LParen, start, start + 1);
                }
                ')' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.push(TokenKind::RParen, start, start + 1);
                }
                '[' => {
                    self.depth += 1;
                    self.push(TokenKind::LBracket, start, start + 1);
                }
                ']' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.push(TokenKind::RBracket, start, start + 1);
                }
                '{' => {
                    self.depth += 1;
                    self.push(TokenKind::LBrace, start, start + 1);
                }
                '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    self.push(TokenKind::RBrace, start, start + 1);
                }
                ',' => self.push(TokenKind::Comma, start, start + 1),
                '=' => match self.chars.peek() {
                    Some((_, '>')) => {
                        self.chars.next();
                        self.push(TokenKind::FatArrow, start, start + 2);
                    }
                    _ => {
                        return Err(ParseError::at(
                            ParseErrorKind::UnexpectedChar('='),
                            Span::new(start, start + 1),
                        ))
                    }
                },
                '\'' | '"' => self.string(start, ch)?,
                ':' => match self.chars.peek() {
                    Some(&(_, c)) if is_ident_start(c) => self.symbol(start),
                    _ => self.push(TokenKind::Colon, start, start + 1),
                },
                c if is_ident_start(c) => self.word(start),
                c => {
                    return Err(ParseError::at(
                        ParseErrorKind::UnexpectedChar(c),
                        Span::new(start, start + c.len_utf8()),
                    ))
                }
            }
        }

        let end = self.src.len();
        self.push(TokenKind::Eof, end, end);
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    /// Consume a `#` comment up to (not including) the newline.
    fn comment(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.chars.next();
        }
    }

    /// Consume a quoted string, handling escapes.
    ///
    /// Single-quoted strings only unescape `\'` and `\\`; double-quoted
    /// strings additionally understand the common control escapes.
    /// `#{...}` interpolation is Ruby, not manifest data, so it is
    /// rejected rather than taken literally.
    fn string(&mut self, start: usize, quote: char) -> Result<(), ParseError> {
        let mut text = String::new();

        while let Some((i, c)) = self.chars.next() {
            if c == quote {
                self.push(TokenKind::Str(text), start, i + 1);
                return Ok(());
            }
            match c {
                '\\' => match self.chars.next() {
                    Some((_, escaped)) if quote == '"' => text.push(unescape(escaped)),
                    Some((_, escaped)) if escaped == '\'' || escaped == '\\' => {
                        text.push(escaped)
                    }
                    // Single quotes keep any other backslash pair as
                    // written.
                    Some((_, escaped)) => {
                        text.push('\\');
                        text.push(escaped);
                    }
                    None => break,
                },
                '#' if quote == '"' => {
                    if let Some(&(_, '{')) = self.chars.peek() {
                        return Err(ParseError::at(
                            ParseErrorKind::UnsupportedConstruct("string interpolation"),
                            Span::new(i, i + 2),
                        ));
                    }
                    text.push('#');
                }
                _ => text.push(c),
            }
        }

        Err(ParseError::at(
            ParseErrorKind::UnterminatedString,
            Span::new(start, self.src.len()),
        ))
    }

    /// Consume a `:symbol`. The leading colon is already consumed.
    fn symbol(&mut self, start: usize) {
        let end = self.ident_end();
        let name = self.src[start + 1..end].to_string();
        self.push(TokenKind::Symbol(name), start, end);
    }

    /// Consume a bare word: an identifier or boolean literal.
    fn word(&mut self, start: usize) {
        let end = self.ident_end();
        let word = &self.src[start..end];
        let kind = match word {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            _ => TokenKind::Ident(word.to_string()),
        };
        self.push(kind, start, end);
    }

    /// Advance past identifier characters, returning the end offset.
    fn ident_end(&mut self) -> usize {
        loop {
            match self.chars.peek() {
                Some(&(i, c)) => {
                    if is_ident_char(c) {
                        self.chars.next();
                    } else {
                        return i;
                    }
                }
                None => return self.src.len(),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn unescape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
