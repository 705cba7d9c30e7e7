//! Recursive descent parser for whole BL programs
//!
//! ```text
//! program     ::= PROGRAM identifier IS instruction* BEGIN block END identifier
//! instruction ::= INSTRUCTION identifier IS block END identifier
//! ```
//!
//! Beyond the grammar: names must be identifiers, instruction names must
//! not be primitive instructions or repeat, closing names must match
//! opening names, and nothing may follow the program.

use tracing::debug;

use crate::error::{ensure, Error, ErrorKind};
use crate::parser::ast::Statement;
use crate::parser::statement::parse_block;
use crate::parser::tokenizer::{is_identifier, Span, TokenQueue};
use crate::parser::{describe, expect_keyword};
use crate::program::{is_primitive, Program};
use crate::Result;

/// Parse one `INSTRUCTION name IS block END name` into `body`, returning the name
///
/// Panics unless the front token is `INSTRUCTION`.
pub fn parse_instruction(tokens: &mut TokenQueue, body: &mut Statement) -> Result<String> {
    assert_eq!(
        tokens.front(),
        "INSTRUCTION",
        "Violation of: <\"INSTRUCTION\"> is proper prefix of tokens"
    );
    tokens.dequeue();

    let (name, span) = expect_identifier(tokens, "instruction name")?;
    ensure(!is_primitive(&name), || {
        Error::new(
            ErrorKind::PrimitiveName,
            format!("instruction name \"{}\" must not be a primitive instruction name", name),
            span,
        )
    })?;

    expect_keyword(tokens, "IS", &format!("after instruction name \"{}\"", name))?;
    parse_block(tokens, body)?;
    expect_keyword(tokens, "END", &format!("to terminate instruction \"{}\"", name))?;
    expect_closing_name(tokens, "instruction", &name)?;

    debug!(instruction = %name, "parsed instruction");
    Ok(name)
}

/// Parse a complete program; the queue must hold nothing after it but the sentinel
pub fn parse_program(tokens: &mut TokenQueue) -> Result<Program> {
    let mut program = Program::new();

    expect_keyword(tokens, "PROGRAM", "at start of program")?;
    let (name, _) = expect_identifier(tokens, "program name")?;
    expect_keyword(tokens, "IS", &format!("after program name \"{}\"", name))?;

    let mut context = program.new_context();
    while tokens.front() == "INSTRUCTION" {
        let span = tokens.front_span();
        let mut body = program.new_body();
        let instruction = parse_instruction(tokens, &mut body)?;
        ensure(!context.contains_key(&instruction), || {
            Error::new(
                ErrorKind::DuplicateInstruction,
                format!(
                    "duplicate instruction name \"{}\"; each user-defined instruction must be unique",
                    instruction
                ),
                span,
            )
        })?;
        context.insert(instruction, body);
    }

    expect_keyword(tokens, "BEGIN", "before program body")?;
    let mut body = program.new_body();
    parse_block(tokens, &mut body)?;
    expect_keyword(tokens, "END", "at end of program body")?;
    expect_closing_name(tokens, "program", &name)?;

    let span = tokens.front_span();
    ensure(tokens.is_at_end(), || {
        Error::new(
            ErrorKind::TrailingContent,
            format!(
                "extra tokens after end of program \"{}\": found {}",
                name,
                describe(tokens.front())
            ),
            span,
        )
    })?;

    debug!(program = %name, instructions = context.len(), "parsed program");

    program.set_name(&name);
    program.replace_context(context);
    program.replace_body(body);
    Ok(program)
}

impl Program {
    /// Parse a program from `tokens` into `self`.
    ///
    /// Name, context and body are replaced together, and only on success;
    /// on failure `self` is unchanged.
    pub fn parse(&mut self, tokens: &mut TokenQueue) -> Result<()> {
        let parsed = parse_program(tokens)?;
        *self = parsed;
        Ok(())
    }
}

fn expect_identifier(tokens: &mut TokenQueue, what: &str) -> Result<(String, Option<Span>)> {
    let span = tokens.front_span();
    ensure(is_identifier(tokens.front()), || {
        Error::new(
            ErrorKind::InvalidIdentifier,
            format!(
                "{} is not a valid BL identifier for the {}",
                describe(tokens.front()),
                what
            ),
            span,
        )
    })?;
    Ok((tokens.dequeue(), span))
}

fn expect_closing_name(tokens: &mut TokenQueue, construct: &str, name: &str) -> Result<()> {
    let span = tokens.front_span();
    ensure(tokens.front() == name, || {
        Error::new(
            ErrorKind::NameMismatch,
            format!(
                "{} ending name {} must match beginning name \"{}\"",
                construct,
                describe(tokens.front()),
                name
            ),
            span,
        )
    })?;
    tokens.dequeue();
    Ok(())
}
