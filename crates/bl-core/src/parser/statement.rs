//! Recursive descent parser for BL statements
//!
//! ```text
//! statement ::= if | while | call
//! if        ::= IF condition THEN block [ ELSE block ] END IF
//! while     ::= WHILE condition DO block END WHILE
//! call      ::= identifier
//! block     ::= statement*
//! ```
//!
//! A block stops, without consuming, at `END`, `ELSE` or end of input, so
//! one token of lookahead decides every step. The procedures are generic
//! over the statement kernel: nested blocks are created with
//! [`StatementKernel::new_instance`] on the statement being parsed.

use crate::error::{ensure, Error, ErrorKind};
use crate::parser::ast::{StatementKernel, StatementLabel, StatementOps};
use crate::parser::condition::{parse_condition, Condition};
use crate::parser::tokenizer::{is_condition, is_identifier, TokenQueue, END_OF_INPUT};
use crate::parser::{describe, expect_keyword};
use crate::Result;

/// Deepest nesting of blocks inside IF/WHILE statements that parses
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse one IF, WHILE or CALL statement from the front of `tokens` into `s`
pub fn parse_statement<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S) -> Result<()> {
    statement_at(tokens, s, 0)
}

/// Parse statements into the BLOCK `block` up to `END`, `ELSE` or end of input
pub fn parse_block<S: StatementKernel>(tokens: &mut TokenQueue, block: &mut S) -> Result<()> {
    block_at(tokens, block, 0)
}

/// Parse `IF c THEN b [ELSE b] END IF` into `s`
///
/// Panics unless the front token is `IF`.
pub fn parse_if<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S) -> Result<()> {
    if_at(tokens, s, 0)
}

/// Parse `WHILE c DO b END WHILE` into `s`
///
/// Panics unless the front token is `WHILE`.
pub fn parse_while<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S) -> Result<()> {
    while_at(tokens, s, 0)
}

/// Parse a CALL into `s`. Any identifier is accepted, primitive or not.
///
/// Panics unless the front token is an identifier.
pub fn parse_call<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S) {
    assert!(
        is_identifier(tokens.front()),
        "Violation of: identifier string is proper prefix of tokens"
    );
    let instruction = tokens.dequeue();
    s.assemble_call(&instruction);
}

// ── Depth-tracking descent ─────────────────────────────────
//
// `depth` counts the blocks enclosing the statement being parsed.

fn statement_at<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S, depth: usize) -> Result<()> {
    if tokens.front() == "IF" {
        if_at(tokens, s, depth)
    } else if tokens.front() == "WHILE" {
        while_at(tokens, s, depth)
    } else if is_identifier(tokens.front()) {
        parse_call(tokens, s);
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::UnexpectedToken,
            format!("expected IF, WHILE, or identifier, found {}", describe(tokens.front())),
            tokens.front_span(),
        ))
    }
}

fn block_at<S: StatementKernel>(tokens: &mut TokenQueue, block: &mut S, depth: usize) -> Result<()> {
    let span = tokens.front_span();
    ensure(depth <= MAX_NESTING_DEPTH, || {
        Error::new(
            ErrorKind::NestingTooDeep,
            format!("statements nested more than {} levels deep", MAX_NESTING_DEPTH),
            span,
        )
    })?;

    let mut statements = Vec::new();
    while !ends_block(tokens.front()) {
        let mut statement = block.new_instance();
        statement_at(tokens, &mut statement, depth)?;
        statements.push(statement);
    }

    block.assemble(StatementLabel::Block, statements);
    Ok(())
}

fn ends_block(token: &str) -> bool {
    token == "END" || token == "ELSE" || token == END_OF_INPUT
}

fn if_at<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S, depth: usize) -> Result<()> {
    assert_eq!(tokens.front(), "IF", "Violation of: <\"IF\"> is proper prefix of tokens");
    tokens.dequeue();

    let condition = expect_condition(tokens, "IF")?;
    expect_keyword(tokens, "THEN", "after IF condition")?;

    let mut then_block = s.new_instance();
    block_at(tokens, &mut then_block, depth + 1)?;

    let span = tokens.front_span();
    ensure(tokens.front() == "ELSE" || tokens.front() == "END", || {
        Error::new(
            ErrorKind::ExpectedKeyword,
            format!("expected \"ELSE\" or \"END\" in IF, found {}", describe(tokens.front())),
            span,
        )
    })?;

    let else_block = if tokens.front() == "ELSE" {
        tokens.dequeue();
        let mut else_block = s.new_instance();
        block_at(tokens, &mut else_block, depth + 1)?;
        Some(else_block)
    } else {
        None
    };

    expect_keyword(tokens, "END", "to close IF")?;
    expect_keyword(tokens, "IF", "after END of IF")?;

    match else_block {
        Some(else_block) => s.assemble_if_else(condition, then_block, else_block),
        None => s.assemble_if(condition, then_block),
    }
    Ok(())
}

fn while_at<S: StatementKernel>(tokens: &mut TokenQueue, s: &mut S, depth: usize) -> Result<()> {
    assert_eq!(
        tokens.front(),
        "WHILE",
        "Violation of: <\"WHILE\"> is proper prefix of tokens"
    );
    tokens.dequeue();

    let condition = expect_condition(tokens, "WHILE")?;
    expect_keyword(tokens, "DO", "after WHILE condition")?;

    let mut body = s.new_instance();
    block_at(tokens, &mut body, depth + 1)?;

    expect_keyword(tokens, "END", "to close WHILE")?;
    expect_keyword(tokens, "WHILE", "after END of WHILE")?;

    s.assemble_while(condition, body);
    Ok(())
}

fn expect_condition(tokens: &mut TokenQueue, construct: &str) -> Result<Condition> {
    let span = tokens.front_span();
    ensure(is_condition(tokens.front()), || {
        Error::new(
            ErrorKind::InvalidCondition,
            format!(
                "expected a condition after {}, found {}",
                construct,
                describe(tokens.front())
            ),
            span,
        )
    })?;
    parse_condition(&tokens.dequeue())
}
