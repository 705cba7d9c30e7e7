//! Error types for the BL parser
//!
//! Every grammar or semantic violation is fatal: the parse procedure that
//! detects it returns `Err` and every caller propagates it with `?`.
//! Nothing in this crate terminates the process; the driver decides that.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::tokenizer::Span;

/// Category of a fatal parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A keyword (`IS`, `THEN`, `DO`, `BEGIN`, `END`, ...) was required
    ExpectedKeyword,
    /// A program or instruction name is not a valid identifier
    InvalidIdentifier,
    /// The token after `IF`/`WHILE` is not a condition
    InvalidCondition,
    /// A declared instruction reuses a primitive instruction name
    PrimitiveName,
    /// Two instruction declarations share a name
    DuplicateInstruction,
    /// Closing name differs from opening name
    NameMismatch,
    /// Tokens remain after the end of the program
    TrailingContent,
    /// A statement was required but the front token cannot start one
    UnexpectedToken,
    /// IF/WHILE statements nested deeper than the parser accepts
    NestingTooDeep,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::ExpectedKeyword => "expected keyword",
            ErrorKind::InvalidIdentifier => "invalid identifier",
            ErrorKind::InvalidCondition => "invalid condition",
            ErrorKind::PrimitiveName => "primitive instruction name",
            ErrorKind::DuplicateInstruction => "duplicate instruction",
            ErrorKind::NameMismatch => "name mismatch",
            ErrorKind::TrailingContent => "trailing content",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::NestingTooDeep => "nesting too deep",
        };
        f.write_str(name)
    }
}

/// Fatal parse error with an optional source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}{}", location(.span))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

fn location(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" at {}", span),
        None => String::new(),
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        let error = Error {
            kind,
            message: message.into(),
            span,
        };
        tracing::debug!(kind = %error.kind, "fatal parse error: {}", error.message);
        error
    }

    /// JSON form used by the CLI `--json` outputs and the bindings
    pub fn to_json(&self) -> serde_json::Value {
        let (line, column) = match &self.span {
            Some(span) => (Some(span.line), Some(span.column)),
            None => (None, None),
        };
        serde_json::json!({
            "kind": self.kind,
            "message": self.message,
            "line": line,
            "column": column,
        })
    }
}

/// Fatal reporter: `Ok(())` when `condition` holds, the built error otherwise.
pub fn ensure(condition: bool, error: impl FnOnce() -> Error) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(error())
    }
}

/// Result type alias for BL parsing
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_span() {
        let err = Error::new(
            ErrorKind::ExpectedKeyword,
            "expected \"IS\", found \"BEGIN\"",
            Some(Span { line: 3, column: 7, offset: 20 }),
        );
        assert_eq!(
            err.to_string(),
            "expected keyword: expected \"IS\", found \"BEGIN\" at 3:7"
        );
    }

    #[test]
    fn test_display_without_span() {
        let err = Error::new(ErrorKind::TrailingContent, "found \"x\"", None);
        assert_eq!(err.to_string(), "trailing content: found \"x\"");
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, || unreachable!()).is_ok());
        let err = ensure(false, || Error::new(ErrorKind::NameMismatch, "p vs q", None))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameMismatch);
    }

    #[test]
    fn test_to_json() {
        let err = Error::new(
            ErrorKind::DuplicateInstruction,
            "dup",
            Some(Span { line: 2, column: 1, offset: 10 }),
        );
        let json = err.to_json();
        assert_eq!(json["kind"], "duplicate_instruction");
        assert_eq!(json["line"], 2);
        assert_eq!(json["column"], 1);
        assert_eq!(json["message"], "dup");
    }
}
