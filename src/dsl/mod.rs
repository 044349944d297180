//! Manifest-language evaluation.
//!
//! The manifest language is a closed grammar of three declarations:
//!
//! ```text
//! forge 'forge.example.com'
//! moduledir 'thirdparty'
//! mod 'puppetlabs/stdlib', '4.1.0'
//! mod 'puppetlabs/apache',
//!   :git => 'https://github.com/puppetlabs/puppetlabs-apache',
//!   :ref => 'docs_experiment'
//! ```
//!
//! It is declarative data, not a scripting language: statements apply
//! to the model strictly in source order, anything outside the three
//! declaration forms fails evaluation, and Ruby constructs (variables,
//! interpolation, control flow) are rejected rather than guessed at.
//! Argument values are recorded structurally and never interpreted
//! here.

pub mod errors;
pub mod lexer;

pub use errors::{ParseError, ParseErrorKind};

use crate::core::args::{ArgMap, ArgValue, ModuleArgs};
use crate::core::puppetfile::Puppetfile;
use crate::dsl::lexer::{Token, TokenKind};

/// Evaluate manifest text against a model.
///
/// Statements apply in order through the model's mutation operations.
/// Evaluation stops at the first unrecognized or malformed statement,
/// leaving the effects of earlier statements in place.
pub fn evaluate(text: &str, librarian: &mut Puppetfile) -> Result<(), ParseError> {
    let tokens = lexer::tokenize(text)?;
    Evaluator {
        tokens,
        pos: 0,
        librarian,
    }
    .run()
}

struct Evaluator<'a> {
    tokens: Vec<Token>,
    pos: usize,
    librarian: &'a mut Puppetfile,
}

impl Evaluator<'_> {
    fn run(mut self) -> Result<(), ParseError> {
        loop {
            self.skip_newlines();
            if *self.peek_kind() == TokenKind::Eof {
                return Ok(());
            }
            self.statement()?;
        }
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let token = self.advance();
        let (name, span) = match token.kind {
            TokenKind::Ident(name) => (name, token.span),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::Unexpected {
                        expected: "a declaration".to_string(),
                        found: other.describe(),
                    },
                    token.span,
                ))
            }
        };

        match name.as_str() {
            "mod" => self.mod_statement(),
            "forge" => self.location_statement("forge"),
            "moduledir" => self.location_statement("moduledir"),
            _ => Err(ParseError::at(
                ParseErrorKind::UnknownDeclaration(name),
                span,
            )),
        }
    }

    /// `mod NAME[, ARGS...]`, with or without parentheses.
    fn mod_statement(&mut self) -> Result<(), ParseError> {
        let parenthesized = self.eat(&TokenKind::LParen);

        let token = self.advance();
        let name = match token.kind {
            TokenKind::Str(name) => name,
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::Unexpected {
                        expected: "a quoted module name".to_string(),
                        found: other.describe(),
                    },
                    token.span,
                ))
            }
        };

        let args = if self.eat(&TokenKind::Comma) {
            self.arguments()?
        } else {
            ModuleArgs::none()
        };

        if parenthesized {
            self.expect(&TokenKind::RParen)?;
        }
        self.end_of_statement()?;

        tracing::trace!("recorded module declaration for {}", name);
        self.librarian.add_module(name, args);
        Ok(())
    }

    /// `forge LOCATION` / `moduledir LOCATION`, with or without
    /// parentheses. Exactly one string argument.
    fn location_statement(&mut self, statement: &'static str) -> Result<(), ParseError> {
        let parenthesized = self.eat(&TokenKind::LParen);

        let token = self.advance();
        let location = match token.kind {
            TokenKind::Str(location) => location,
            _ => {
                return Err(ParseError::at(
                    ParseErrorKind::ExpectsLocation(statement),
                    token.span,
                ))
            }
        };

        if parenthesized {
            self.expect(&TokenKind::RParen)?;
        }
        self.end_of_statement()?;

        if statement == "forge" {
            tracing::trace!("forge set to {}", location);
            self.librarian.set_forge(location);
        } else {
            tracing::trace!("moduledir set to {}", location);
            self.librarian.set_moduledir(location);
        }
        Ok(())
    }

    /// Comma-separated argument list. Positional values come first;
    /// trailing keyword pairs collapse into a single map value, the way
    /// the manifest language groups them.
    fn arguments(&mut self) -> Result<ModuleArgs, ParseError> {
        let mut values = Vec::new();
        let mut keywords = ArgMap::new();

        loop {
            self.skip_newlines();
            if self.pair_follows() {
                let key = self.pair_key()?;
                let value = self.value()?;
                keywords.insert(key, value);
            } else if !keywords.is_empty() {
                let token = self.advance();
                return Err(ParseError::at(
                    ParseErrorKind::Unexpected {
                        expected: "another keyword argument".to_string(),
                        found: token.kind.describe(),
                    },
                    token.span,
                ));
            } else {
                values.push(self.value()?);
            }

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        if !keywords.is_empty() {
            values.push(ArgValue::Map(keywords));
        }
        Ok(ModuleArgs::from(values))
    }

    /// One literal or container value.
    fn value(&mut self) -> Result<ArgValue, ParseError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Str(s) => Ok(ArgValue::Str(s)),
            TokenKind::Symbol(s) => Ok(ArgValue::Symbol(s)),
            TokenKind::Bool(b) => Ok(ArgValue::Bool(b)),
            TokenKind::LBracket => self.list(),
            TokenKind::LBrace => self.map(),
            TokenKind::Ident(_) => Err(ParseError::at(
                ParseErrorKind::UnsupportedConstruct("bare words and variables"),
                token.span,
            )),
            other => Err(ParseError::at(
                ParseErrorKind::Unexpected {
                    expected: "a value".to_string(),
                    found: other.describe(),
                },
                token.span,
            )),
        }
    }

    /// `[ value, ... ]`, opening bracket already consumed.
    fn list(&mut self) -> Result<ArgValue, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat(&TokenKind::RBracket) {
                break;
            }
            items.push(self.value()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBracket)?;
                break;
            }
        }
        Ok(ArgValue::List(items))
    }

    /// `{ key => value, ... }`, opening brace already consumed.
    fn map(&mut self) -> Result<ArgValue, ParseError> {
        let mut entries = ArgMap::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                break;
            }
            let key = self.pair_key()?;
            let value = self.value()?;
            entries.insert(key, value);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }
        Ok(ArgValue::Map(entries))
    }

    /// True if the next tokens start a keyword pair: `:key =>`,
    /// `'key' =>`, or `key:`.
    fn pair_follows(&self) -> bool {
        matches!(
            (self.peek_kind(), self.peek_kind_at(1)),
            (TokenKind::Symbol(_), TokenKind::FatArrow)
                | (TokenKind::Str(_), TokenKind::FatArrow)
                | (TokenKind::Ident(_), TokenKind::Colon)
        )
    }

    /// Consume a keyword-pair key and its separator.
    fn pair_key(&mut self) -> Result<String, ParseError> {
        let token = self.advance();
        let (key, separator) = match token.kind {
            TokenKind::Symbol(key) | TokenKind::Str(key) => (key, TokenKind::FatArrow),
            TokenKind::Ident(key) => (key, TokenKind::Colon),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::Unexpected {
                        expected: "a keyword argument".to_string(),
                        found: other.describe(),
                    },
                    token.span,
                ))
            }
        };
        self.expect(&separator)?;
        self.skip_newlines();
        Ok(key)
    }

    fn end_of_statement(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => {
                let token = self.advance();
                Err(ParseError::at(
                    ParseErrorKind::Unexpected {
                        expected: "end of statement".to_string(),
                        found: token.kind.describe(),
                    },
                    token.span,
                ))
            }
        }
    }

    fn skip_newlines(&mut self) {
        while *self.peek_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    /// Consume and return the current token. The cursor never moves
    /// past the trailing Eof token.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        let token = self.advance();
        if token.kind == *kind {
            Ok(())
        } else {
            Err(ParseError::at(
                ParseErrorKind::Unexpected {
                    expected: kind.describe(),
                    found: token.kind.describe(),
                },
                token.span,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn eval(text: &str) -> Result<Puppetfile, ParseError> {
        let mut puppetfile = Puppetfile::new("/env");
        evaluate(text, &mut puppetfile)?;
        Ok(puppetfile)
    }

    fn module_map(puppetfile: &Puppetfile, index: usize) -> &ArgMap {
        puppetfile.modules()[index]
            .args()
            .first()
            .and_then(ArgValue::as_map)
            .expect("map args")
    }

    #[test]
    fn test_modules_keep_statement_order() {
        let puppetfile = eval("mod 'c'\nmod 'a'\nmod 'b'\n").unwrap();
        assert_eq!(puppetfile.desired_contents(), ["c", "a", "b"]);
    }

    #[test]
    fn test_paren_and_bare_call_syntax_match() {
        let bare = eval("mod 'apache', '0.6.0'\n").unwrap();
        let parens = eval("mod('apache', '0.6.0')\n").unwrap();
        assert_eq!(bare.modules(), parens.modules());
    }

    #[test]
    fn test_mod_without_args() {
        let puppetfile = eval("mod 'apache'\n").unwrap();
        assert!(puppetfile.modules()[0].args().is_empty());
    }

    #[test]
    fn test_mod_with_version_literal() {
        let puppetfile = eval("mod 'stdlib', '4.1.0'\n").unwrap();
        assert_eq!(
            puppetfile.modules()[0].args().values(),
            [ArgValue::Str("4.1.0".to_string())]
        );
    }

    #[test]
    fn test_mod_with_symbol_argument() {
        let puppetfile = eval("mod 'stdlib', :latest\n").unwrap();
        assert_eq!(
            puppetfile.modules()[0].args().values(),
            [ArgValue::Symbol("latest".to_string())]
        );
    }

    #[test]
    fn test_mod_with_git_keywords() {
        let puppetfile = eval(
            "mod 'apache', :git => 'https://example.com/apache.git', :ref => '8820892'\n",
        )
        .unwrap();

        let map = module_map(&puppetfile, 0);
        assert_eq!(
            map.get("git").and_then(ArgValue::as_str),
            Some("https://example.com/apache.git")
        );
        assert_eq!(map.get("ref").and_then(ArgValue::as_str), Some("8820892"));
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["git", "ref"]);
    }

    #[test]
    fn test_rocket_and_colon_key_styles_match() {
        let rockets = eval("mod 'a', :git => 'u', :ref => 'r'\n").unwrap();
        let colons = eval("mod 'a', git: 'u', ref: 'r'\n").unwrap();
        assert_eq!(rockets.modules(), colons.modules());
    }

    #[test]
    fn test_multiline_declaration_with_trailing_commas() {
        let puppetfile = eval(
            "mod 'apache',\n  :git => 'https://example.com/apache.git',\n  :ref => 'docs'\n",
        )
        .unwrap();

        let map = module_map(&puppetfile, 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_version_and_keywords_together() {
        let puppetfile = eval("mod 'apache', '0.6.0', :rename => true\n").unwrap();

        let values = puppetfile.modules()[0].args().values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], ArgValue::Str("0.6.0".to_string()));
        assert_eq!(
            values[1].as_map().and_then(|m| m.get("rename")),
            Some(&ArgValue::Bool(true))
        );
    }

    #[test]
    fn test_list_argument() {
        let puppetfile = eval("mod 'a', ['x', 'y']\n").unwrap();
        assert_eq!(
            puppetfile.modules()[0].args().values(),
            [ArgValue::List(vec![
                ArgValue::Str("x".to_string()),
                ArgValue::Str("y".to_string()),
            ])]
        );
    }

    #[test]
    fn test_nested_map_argument() {
        let puppetfile =
            eval("mod 'a', :install_options => { :force => true }\n").unwrap();

        let map = module_map(&puppetfile, 0);
        let nested = map
            .get("install_options")
            .and_then(ArgValue::as_map)
            .unwrap();
        assert_eq!(nested.get("force"), Some(&ArgValue::Bool(true)));
    }

    #[test]
    fn test_forge_statement() {
        let puppetfile = eval("forge 'forge.example.com'\n").unwrap();
        assert_eq!(puppetfile.forge(), "forge.example.com");
    }

    #[test]
    fn test_moduledir_relative_and_absolute() {
        let puppetfile = eval("moduledir 'thirdparty'\n").unwrap();
        assert_eq!(puppetfile.moduledir(), Path::new("/env/thirdparty"));

        let puppetfile = eval("moduledir '/opt/modules'\n").unwrap();
        assert_eq!(puppetfile.moduledir(), Path::new("/opt/modules"));
    }

    #[test]
    fn test_last_forge_statement_wins() {
        let puppetfile = eval("forge 'one'\nforge 'two'\n").unwrap();
        assert_eq!(puppetfile.forge(), "two");
    }

    #[test]
    fn test_comments_and_blank_lines_are_inert() {
        let puppetfile = eval("# tracked modules\n\nmod 'a'\n\n# done\n").unwrap();
        assert_eq!(puppetfile.desired_contents(), ["a"]);
    }

    #[test]
    fn test_unknown_declaration_stops_evaluation() {
        let text = "mod 'a'\ninclude 'b'\nmod 'c'\n";
        let mut puppetfile = Puppetfile::new("/env");
        let err = evaluate(text, &mut puppetfile).unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownDeclaration("include".to_string())
        );
        assert_eq!(puppetfile.desired_contents(), ["a"]);
    }

    #[test]
    fn test_unknown_declaration_span_points_at_the_name() {
        let text = "mod 'a'\nunknown_thing 'b'\n";
        let err = eval(text).unwrap_err();

        let span = err.span.unwrap();
        assert_eq!(&text[span.offset()..span.offset() + span.len()], "unknown_thing");
    }

    #[test]
    fn test_forge_requires_a_string() {
        let err = eval("forge\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectsLocation("forge"));

        let err = eval("forge :latest\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectsLocation("forge"));
    }

    #[test]
    fn test_forge_rejects_extra_arguments() {
        let err = eval("forge 'a', 'b'\n").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Unexpected { .. }));
    }

    #[test]
    fn test_mod_name_must_be_quoted() {
        let err = eval("mod apache\n").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Unexpected { .. }));
    }

    #[test]
    fn test_variables_are_unsupported() {
        let err = eval("mod 'a', some_var\n").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnsupportedConstruct("bare words and variables")
        );
    }

    #[test]
    fn test_duplicate_modules_are_kept() {
        let puppetfile = eval("mod 'a'\nmod 'a'\n").unwrap();
        assert_eq!(puppetfile.desired_contents(), ["a", "a"]);
    }

    #[test]
    fn test_empty_manifest() {
        let puppetfile = eval("").unwrap();
        assert!(puppetfile.modules().is_empty());
    }
}
