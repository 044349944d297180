//! Parse error types and diagnostics.

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::dsl::lexer::Span;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Why evaluation of a manifest failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unrecognized declaration `{0}`")]
    UnknownDeclaration(String),

    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(&'static str),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),

    #[error("`{0}` expects a single quoted location")]
    ExpectsLocation(&'static str),

    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },
}

/// Parse failure, with position information for the offending
/// statement when the manifest text is attached.
///
/// Statements evaluated before the failure stay applied; the error
/// describes only the statement that stopped evaluation.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{kind}")]
#[diagnostic(code(puppetfile::parse))]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,

    #[source_code]
    src: Option<NamedSource<String>>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    help: Option<String>,
}

impl ParseError {
    /// Create an error anchored at a span of the manifest text.
    pub fn at(kind: ParseErrorKind, span: Span) -> Self {
        let help = help_for(&kind);
        ParseError {
            kind,
            src: None,
            span: Some(span.into()),
            help,
        }
    }

    /// Attach the manifest name and text so the span can be rendered
    /// as a source snippet.
    pub fn with_source(mut self, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.src = Some(NamedSource::new(name, text.into()));
        self
    }

    /// Name of the manifest the error came from, if attached.
    pub fn source_name(&self) -> Option<&str> {
        self.src.as_ref().map(|src| src.name())
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.kind.to_string());
        if let Some(name) = self.source_name() {
            diag = diag.with_location(name);
        }
        if let Some(help) = &self.help {
            diag = diag.with_suggestion(help.clone());
        }
        diag
    }
}

fn help_for(kind: &ParseErrorKind) -> Option<String> {
    match kind {
        ParseErrorKind::UnknownDeclaration(_) => {
            Some(suggestions::UNKNOWN_DECLARATION.to_string())
        }
        ParseErrorKind::UnsupportedConstruct(_) => {
            Some(suggestions::UNSUPPORTED_CONSTRUCT.to_string())
        }
        ParseErrorKind::ExpectsLocation(_) => Some(suggestions::QUOTE_LITERALS.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_the_declaration() {
        let err = ParseError::at(
            ParseErrorKind::UnknownDeclaration("unknown_thing".to_string()),
            Span::new(0, 13),
        );
        assert_eq!(err.to_string(), "unrecognized declaration `unknown_thing`");
    }

    #[test]
    fn test_with_source_records_the_manifest_name() {
        let err = ParseError::at(ParseErrorKind::UnterminatedString, Span::new(4, 8))
            .with_source("/env/Puppetfile", "mod 'broken".to_string());
        assert_eq!(err.source_name(), Some("/env/Puppetfile"));
    }

    #[test]
    fn test_to_diagnostic_suggests_supported_declarations() {
        let err = ParseError::at(
            ParseErrorKind::UnknownDeclaration("include".to_string()),
            Span::new(0, 7),
        )
        .with_source("/env/Puppetfile", "include 'x'".to_string());

        let diag = err.to_diagnostic();
        let rendered = diag.render(false);
        assert!(rendered.contains("unrecognized declaration `include`"));
        assert!(rendered.contains("/env/Puppetfile"));
        assert!(rendered.contains("Supported declarations"));
    }
}
