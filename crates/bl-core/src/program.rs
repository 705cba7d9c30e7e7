//! BL program — name, user-defined instructions, and main body

use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::ast::{Kind, Statement, StatementKernel};
use crate::parser::tokenizer::is_identifier;

/// Built-in instructions, callable without declaration
pub const PRIMITIVE_INSTRUCTIONS: [&str; 5] = ["move", "turnleft", "turnright", "infect", "skip"];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_INSTRUCTIONS.contains(&name)
}

/// Mapping from user-defined instruction name to its BLOCK body.
///
/// Ordered so printing and hashing are deterministic.
pub type Context = BTreeMap<String, Statement>;

/// A parsed BL program
///
/// Invariants: `name` and every context key are identifiers, no context key
/// is a primitive instruction name, and every context value is a BLOCK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    name: String,
    context: Context,
    body: Statement,
}

impl Program {
    pub const DEFAULT_NAME: &'static str = "Unnamed";

    /// Program named `Unnamed` with no instructions and an empty body
    pub fn new() -> Self {
        Program {
            name: Self::DEFAULT_NAME.to_string(),
            context: Context::new(),
            body: Statement::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        assert!(is_identifier(name), "Violation of: n is a valid IDENTIFIER");
        self.name = name.to_string();
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }

    /// Body of a user-defined instruction
    pub fn instruction(&self, name: &str) -> Option<&Statement> {
        self.context.get(name)
    }

    pub fn new_context(&self) -> Context {
        Context::new()
    }

    pub fn new_body(&self) -> Statement {
        self.body.new_instance()
    }

    /// Install `context`, returning the previous one
    pub fn replace_context(&mut self, context: Context) -> Context {
        for (name, body) in &context {
            assert!(
                is_identifier(name) && !is_primitive(name),
                "Violation of: [names in c are valid IDENTIFIERs that are not primitive instructions]"
            );
            assert_eq!(
                body.kind(),
                Kind::Block,
                "Violation of: [bodies in c are all BLOCK statements]"
            );
        }
        std::mem::replace(&mut self.context, context)
    }

    /// Install `body`, returning the previous one
    pub fn replace_body(&mut self, body: Statement) -> Statement {
        assert_eq!(body.kind(), Kind::Block, "Violation of: [b is a BLOCK statement]");
        std::mem::replace(&mut self.body, body)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::StatementOps;

    fn call_block(name: &str) -> Statement {
        let mut call = Statement::new();
        call.assemble_call(name);
        let mut block = Statement::new();
        block.add_to_block(0, call);
        block
    }

    #[test]
    fn test_default_program() {
        let p = Program::new();
        assert_eq!(p.name(), "Unnamed");
        assert!(p.context().is_empty());
        assert_eq!(p.body(), &Statement::new());
        assert_eq!(p, Program::default());
    }

    #[test]
    fn test_replace_context_and_body() {
        let mut p = Program::new();
        let mut ctx = p.new_context();
        ctx.insert("step".to_string(), call_block("move"));
        let old = p.replace_context(ctx);
        assert!(old.is_empty());
        assert_eq!(p.instruction("step"), Some(&call_block("move")));

        let old_body = p.replace_body(call_block("step"));
        assert_eq!(old_body, Statement::new());
        assert_eq!(p.body(), &call_block("step"));
    }

    #[test]
    fn test_primitive_names() {
        for name in PRIMITIVE_INSTRUCTIONS {
            assert!(is_primitive(name));
            assert!(is_identifier(name));
        }
        assert!(!is_primitive("Move"));
    }

    #[test]
    #[should_panic(expected = "not primitive instructions")]
    fn test_context_with_primitive_name_panics() {
        let mut ctx = Context::new();
        ctx.insert("skip".to_string(), Statement::new());
        Program::new().replace_context(ctx);
    }

    #[test]
    #[should_panic(expected = "Violation of: n is a valid IDENTIFIER")]
    fn test_set_keyword_name_panics() {
        Program::new().set_name("BEGIN");
    }
}
