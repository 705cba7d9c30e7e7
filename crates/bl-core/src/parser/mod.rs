//! BL Parser — tokenizer, statement kernel, and recursive descent parser
//!
//! Converts BL text into a [`Program`] (or a bare statement block).
//! Parsing is fail-fast: the first violation is returned as an [`Error`]
//! and no partially built tree escapes.

pub mod ast;
pub mod condition;
pub mod program;
pub mod statement;
pub mod tokenizer;

use crate::error::{ensure, Error, ErrorKind};
use crate::program::Program;
use crate::Result;

use self::ast::Statement;
use self::tokenizer::{tokenize, TokenQueue, END_OF_INPUT};

/// Parse BL program text
///
/// # Example
/// ```
/// let program = bl_core::parser::parse("PROGRAM p IS BEGIN move END p").unwrap();
/// assert_eq!(program.name(), "p");
/// ```
pub fn parse(text: &str) -> Result<Program> {
    let mut tokens = tokenize(text);
    program::parse_program(&mut tokens)
}

/// Parse text holding a bare block of statements (no PROGRAM wrapper)
pub fn parse_statements(text: &str) -> Result<Statement> {
    let mut tokens = tokenize(text);
    let mut block = Statement::new();
    statement::parse_block(&mut tokens, &mut block)?;

    let span = tokens.front_span();
    ensure(tokens.is_at_end(), || {
        Error::new(
            ErrorKind::TrailingContent,
            format!("unexpected {} after statements", describe(tokens.front())),
            span,
        )
    })?;
    Ok(block)
}

/// Token as shown in diagnostics
pub(crate) fn describe(token: &str) -> String {
    if token == END_OF_INPUT {
        "end of input".to_string()
    } else {
        format!("\"{}\"", token)
    }
}

/// Consume `keyword` or fail with an `ExpectedKeyword` error
pub(crate) fn expect_keyword(tokens: &mut TokenQueue, keyword: &str, context: &str) -> Result<()> {
    let span = tokens.front_span();
    ensure(tokens.front() == keyword, || {
        Error::new(
            ErrorKind::ExpectedKeyword,
            format!(
                "expected \"{}\" {}, found {}",
                keyword,
                context,
                describe(tokens.front())
            ),
            span,
        )
    })?;
    tokens.dequeue();
    Ok(())
}
