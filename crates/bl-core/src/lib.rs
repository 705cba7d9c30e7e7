//! BL Core - parser for the BL robot-control language
//!
//! BL programs declare named instructions built from primitive actions
//! (`move`, `turnleft`, `turnright`, `infect`, `skip`) and structured
//! control flow, then run a main body.
//!
//! # Architecture
//!
//! ```text
//! BL Text → Tokenizer → TokenQueue → Program Parser → Program
//!                                         ↓
//!                                  Statement Parser → Statement (kernel-built tree)
//!                                         ↓
//!                                     Printer → canonical text, SHA-256
//! ```
//!
//! # Guarantees
//!
//! - **Fail-fast**: the first grammar or semantic violation is returned as
//!   an [`Error`]; no partial program is ever produced
//! - **Kernel-only mutation**: statement trees change only through
//!   `assemble`/`disassemble`; every other edit is derived from them
//! - **Deterministic**: same input always produces the same tree and text

pub mod error;
pub mod parser;
pub mod printer;
pub mod program;

pub use error::{Error, ErrorKind, Result};
pub use parser::ast::{Kind, Statement, StatementKernel, StatementLabel, StatementOps};
pub use parser::condition::Condition;
pub use parser::{parse, parse_statements};
pub use printer::{print_program, print_statement, program_hash};
pub use parser::statement::MAX_NESTING_DEPTH;
pub use program::{Program, PRIMITIVE_INSTRUCTIONS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_serialization() {
        let program = parse(
            "PROGRAM p IS
               INSTRUCTION hop IS move END hop
             BEGIN
               IF random THEN hop ELSE skip END IF
             END p",
        )
        .unwrap();
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["name"], "p");
        assert_eq!(json["context"]["hop"]["children"][0]["label"]["instruction"], "move");
        let if_else = &json["body"]["children"][0];
        assert_eq!(if_else["label"]["kind"], "IF_ELSE");
        assert_eq!(if_else["label"]["condition"], "RANDOM");
        assert_eq!(if_else["children"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_split_if_else_into_branches() {
        let mut body = parse_statements("IF next-is-friend THEN move ELSE turnleft END IF")
            .unwrap();
        let mut if_else = body.remove_from_block(0);
        let (condition, then_block, else_block) = if_else.disassemble_if_else();
        assert_eq!(condition, Condition::NextIsFriend);
        assert_eq!(then_block, parse_statements("move").unwrap());
        assert_eq!(else_block, parse_statements("turnleft").unwrap());
        assert_eq!(body.length_of_block(), 0);
    }
}
