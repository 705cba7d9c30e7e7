//! Canonical printer — renders statements and programs back to BL text
//!
//! Output uses two-space indentation per nesting level, one statement per
//! line, and instructions in name order. Parsing the printed text yields
//! the same tree, so the canonical text is also what [`program_hash`]
//! fingerprints.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::parser::ast::{Statement, StatementLabel};
use crate::program::Program;

const INDENT: usize = 2;

// ── Public API ─────────────────────────────────────────────

/// Render `statement` with every line indented by `indent` spaces
pub fn print_statement(statement: &Statement, indent: usize) -> String {
    let mut out = String::new();
    write_statement(&mut out, statement, indent);
    out
}

/// Render a whole program in canonical form
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();

    out.push_str(&format!("PROGRAM {} IS\n\n", program.name()));
    for (name, body) in program.context() {
        write_indent(&mut out, INDENT);
        out.push_str(&format!("INSTRUCTION {} IS\n", name));
        write_statement(&mut out, body, 2 * INDENT);
        write_indent(&mut out, INDENT);
        out.push_str(&format!("END {}\n\n", name));
    }
    out.push_str("BEGIN\n");
    write_statement(&mut out, program.body(), INDENT);
    out.push_str(&format!("END {}\n", program.name()));

    out
}

/// SHA-256 of the canonical text, lowercase hex
///
/// Programs that differ only in layout or comments hash equal.
pub fn program_hash(program: &Program) -> String {
    let canonical = print_program(program);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Statement writer ───────────────────────────────────────

fn write_statement(out: &mut String, statement: &Statement, indent: usize) {
    let children = statement.children();
    match statement.label() {
        StatementLabel::Block => {
            for child in children {
                write_statement(out, child, indent);
            }
        }
        StatementLabel::If { condition } => {
            write_line(out, indent, &format!("IF {} THEN", condition));
            write_statement(out, &children[0], indent + INDENT);
            write_line(out, indent, "END IF");
        }
        StatementLabel::IfElse { condition } => {
            write_line(out, indent, &format!("IF {} THEN", condition));
            write_statement(out, &children[0], indent + INDENT);
            write_line(out, indent, "ELSE");
            write_statement(out, &children[1], indent + INDENT);
            write_line(out, indent, "END IF");
        }
        StatementLabel::While { condition } => {
            write_line(out, indent, &format!("WHILE {} DO", condition));
            write_statement(out, &children[0], indent + INDENT);
            write_line(out, indent, "END WHILE");
        }
        StatementLabel::Call { instruction } => write_line(out, indent, instruction),
    }
}

fn write_line(out: &mut String, indent: usize, text: &str) {
    write_indent(out, indent);
    out.push_str(text);
    out.push('\n');
}

fn write_indent(out: &mut String, n: usize) {
    for _ in 0..n {
        out.push(' ');
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&print_statement(self, 0))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&print_program(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_statements};

    const WALKER: &str = "PROGRAM Walker IS
  INSTRUCTION turn-around IS turnleft turnleft END turn-around
  INSTRUCTION avoid IS
    IF next-is-wall THEN turn-around ELSE move END IF
  END avoid
BEGIN
  WHILE true DO
    IF next-is-enemy THEN infect END IF
    avoid
  END WHILE
END Walker";

    // ── Layout ─────────────────────────────────────────

    #[test]
    fn test_print_program_layout() {
        let printed = print_program(&parse(WALKER).unwrap());
        let expected = "PROGRAM Walker IS

  INSTRUCTION avoid IS
    IF next-is-wall THEN
      turn-around
    ELSE
      move
    END IF
  END avoid

  INSTRUCTION turn-around IS
    turnleft
    turnleft
  END turn-around

BEGIN
  WHILE true DO
    IF next-is-enemy THEN
      infect
    END IF
    avoid
  END WHILE
END Walker
";
        assert_eq!(printed, expected);
    }

    #[test]
    fn test_print_empty_program() {
        let printed = print_program(&parse("PROGRAM p IS BEGIN END p").unwrap());
        assert_eq!(printed, "PROGRAM p IS\n\nBEGIN\nEND p\n");
    }

    #[test]
    fn test_print_statement_with_offset() {
        let block = parse_statements("WHILE random DO skip END WHILE").unwrap();
        assert_eq!(
            print_statement(&block, 4),
            "    WHILE random DO\n      skip\n    END WHILE\n"
        );
        assert_eq!(block.to_string(), print_statement(&block, 0));
    }

    // ── Round trip & hashing ───────────────────────────

    #[test]
    fn test_printed_program_parses_to_same_tree() {
        let program = parse(WALKER).unwrap();
        let reparsed = parse(&program.to_string()).unwrap();
        assert_eq!(program, reparsed);
    }

    #[test]
    fn test_print_is_idempotent() {
        let once = print_program(&parse(WALKER).unwrap());
        let twice = print_program(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_hash_ignores_layout_and_comments() {
        let compact = "PROGRAM p IS BEGIN move skip END p";
        let spread = "# robot\nPROGRAM p IS\nBEGIN\n    move # step\n    skip\nEND p\n";
        let a = program_hash(&parse(compact).unwrap());
        let b = program_hash(&parse(spread).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_programs_different_hashes() {
        let a = program_hash(&parse("PROGRAM p IS BEGIN move END p").unwrap());
        let b = program_hash(&parse("PROGRAM p IS BEGIN skip END p").unwrap());
        assert_ne!(a, b);
    }
}
