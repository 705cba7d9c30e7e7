//! BL AST — statement trees and their structural kernel
//!
//! A statement is a tree: one [`StatementLabel`] plus an ordered list of
//! child statements. The label's kind fixes the shape of the children:
//!
//! | Kind    | Children                         |
//! |---------|----------------------------------|
//! | BLOCK   | 0..N, none of them a BLOCK       |
//! | IF      | exactly 1 BLOCK                  |
//! | IF_ELSE | exactly 2 BLOCKs (then, else)    |
//! | WHILE   | exactly 1 BLOCK                  |
//! | CALL    | none                             |
//!
//! The tree is only ever changed through [`StatementKernel::assemble`] and
//! [`StatementKernel::disassemble`]. Every other edit in [`StatementOps`]
//! is written against those two, so it works for any kernel implementation.
//! Sub-statements move by value: a child handed to an assemble-family
//! operation becomes owned by the receiver, so trees never alias.
//!
//! Breaking the shape table is a contract violation and panics; it can
//! only come from misuse of the kernel, never from parsing.

use serde::{Deserialize, Serialize};

use crate::parser::condition::Condition;
use crate::parser::tokenizer::is_identifier;

/// Statement kind, the discriminant of [`StatementLabel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Block,
    If,
    IfElse,
    While,
    Call,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Kind::Block => "BLOCK",
            Kind::If => "IF",
            Kind::IfElse => "IF_ELSE",
            Kind::While => "WHILE",
            Kind::Call => "CALL",
        };
        f.write_str(name)
    }
}

/// Root payload of a statement tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementLabel {
    Block,
    If { condition: Condition },
    IfElse { condition: Condition },
    While { condition: Condition },
    Call { instruction: String },
}

impl StatementLabel {
    pub fn kind(&self) -> Kind {
        match self {
            StatementLabel::Block => Kind::Block,
            StatementLabel::If { .. } => Kind::If,
            StatementLabel::IfElse { .. } => Kind::IfElse,
            StatementLabel::While { .. } => Kind::While,
            StatementLabel::Call { .. } => Kind::Call,
        }
    }

    pub fn condition(&self) -> Option<Condition> {
        match self {
            StatementLabel::If { condition }
            | StatementLabel::IfElse { condition }
            | StatementLabel::While { condition } => Some(*condition),
            StatementLabel::Block | StatementLabel::Call { .. } => None,
        }
    }

    pub fn instruction(&self) -> Option<&str> {
        match self {
            StatementLabel::Call { instruction } => Some(instruction),
            _ => None,
        }
    }

    /// True when `child_kinds` is a legal child list for this label
    pub fn accepts(&self, child_kinds: impl IntoIterator<Item = Kind>) -> bool {
        let mut kinds = child_kinds.into_iter();
        match self {
            StatementLabel::Block => kinds.all(|k| k != Kind::Block),
            StatementLabel::If { .. } | StatementLabel::While { .. } => {
                kinds.next() == Some(Kind::Block) && kinds.next().is_none()
            }
            StatementLabel::IfElse { .. } => {
                kinds.next() == Some(Kind::Block)
                    && kinds.next() == Some(Kind::Block)
                    && kinds.next().is_none()
            }
            StatementLabel::Call { instruction } => {
                kinds.next().is_none() && is_identifier(instruction)
            }
        }
    }
}

// ── Kernel ─────────────────────────────────────────────────

/// Minimal mutators every statement representation provides
pub trait StatementKernel: Sized {
    /// Fresh empty BLOCK of the same representation
    fn new_instance(&self) -> Self;

    fn kind(&self) -> Kind;

    /// Replace this statement with `label` over `children`.
    ///
    /// Panics if the children do not fit the label's shape.
    fn assemble(&mut self, label: StatementLabel, children: Vec<Self>);

    /// Take the label and children out, leaving an empty BLOCK behind
    fn disassemble(&mut self) -> (StatementLabel, Vec<Self>);

    /// Take over the whole tree of `source`
    fn transfer_from(&mut self, source: Self);

    /// Reset to an empty BLOCK
    fn clear(&mut self) {
        let empty = self.new_instance();
        self.transfer_from(empty);
    }
}

// ── Derived operations ─────────────────────────────────────

/// Structural edits derived purely from the kernel
pub trait StatementOps: StatementKernel {
    /// Number of statements in this BLOCK
    ///
    /// Takes `&mut self` because it is derived from `disassemble` and
    /// `assemble`; the block is identical afterwards.
    fn length_of_block(&mut self) -> usize {
        assert_eq!(self.kind(), Kind::Block, "Violation of: [this is a BLOCK statement]");
        let (label, children) = self.disassemble();
        let length = children.len();
        self.assemble(label, children);
        length
    }

    /// Insert `s` at `pos` in this BLOCK
    fn add_to_block(&mut self, pos: usize, s: Self) {
        assert_eq!(self.kind(), Kind::Block, "Violation of: [this is a BLOCK statement]");
        assert_ne!(s.kind(), Kind::Block, "Violation of: [s is not a BLOCK statement]");
        let (label, mut children) = self.disassemble();
        assert!(
            pos <= children.len(),
            "Violation of: 0 <= pos <= [length of this BLOCK]"
        );
        children.insert(pos, s);
        self.assemble(label, children);
    }

    /// Remove and return the statement at `pos` in this BLOCK
    fn remove_from_block(&mut self, pos: usize) -> Self {
        assert_eq!(self.kind(), Kind::Block, "Violation of: [this is a BLOCK statement]");
        let (label, mut children) = self.disassemble();
        assert!(
            pos < children.len(),
            "Violation of: 0 <= pos < [length of this BLOCK]"
        );
        let removed = children.remove(pos);
        self.assemble(label, children);
        removed
    }

    fn assemble_if(&mut self, condition: Condition, block: Self) {
        assert_eq!(block.kind(), Kind::Block, "Violation of: [s is a BLOCK statement]");
        self.assemble(StatementLabel::If { condition }, vec![block]);
    }

    /// Split an IF into its condition and body, leaving an empty BLOCK
    fn disassemble_if(&mut self) -> (Condition, Self) {
        assert_eq!(self.kind(), Kind::If, "Violation of: [this is an IF statement]");
        let (label, children) = self.disassemble();
        let condition = label_condition(&label);
        let [block] = take_children(children);
        (condition, block)
    }

    fn assemble_if_else(&mut self, condition: Condition, then_block: Self, else_block: Self) {
        assert_eq!(then_block.kind(), Kind::Block, "Violation of: [s1 is a BLOCK statement]");
        assert_eq!(else_block.kind(), Kind::Block, "Violation of: [s2 is a BLOCK statement]");
        self.assemble(StatementLabel::IfElse { condition }, vec![then_block, else_block]);
    }

    /// Split an IF_ELSE into its condition, then-block and else-block
    fn disassemble_if_else(&mut self) -> (Condition, Self, Self) {
        assert_eq!(self.kind(), Kind::IfElse, "Violation of: [this is an IF_ELSE statement]");
        let (label, children) = self.disassemble();
        let condition = label_condition(&label);
        let [then_block, else_block] = take_children(children);
        (condition, then_block, else_block)
    }

    fn assemble_while(&mut self, condition: Condition, block: Self) {
        assert_eq!(block.kind(), Kind::Block, "Violation of: [s is a BLOCK statement]");
        self.assemble(StatementLabel::While { condition }, vec![block]);
    }

    fn disassemble_while(&mut self) -> (Condition, Self) {
        assert_eq!(self.kind(), Kind::While, "Violation of: [this is a WHILE statement]");
        let (label, children) = self.disassemble();
        let condition = label_condition(&label);
        let [block] = take_children(children);
        (condition, block)
    }

    fn assemble_call(&mut self, instruction: &str) {
        assert!(is_identifier(instruction), "Violation of: inst is a valid IDENTIFIER");
        self.assemble(
            StatementLabel::Call {
                instruction: instruction.to_string(),
            },
            Vec::new(),
        );
    }

    fn disassemble_call(&mut self) -> String {
        assert_eq!(self.kind(), Kind::Call, "Violation of: [this is a CALL statement]");
        match self.disassemble() {
            (StatementLabel::Call { instruction }, _) => instruction,
            (label, _) => unreachable!("CALL kind with {:?} label", label),
        }
    }
}

impl<S: StatementKernel> StatementOps for S {}

fn label_condition(label: &StatementLabel) -> Condition {
    match label.condition() {
        Some(condition) => condition,
        None => unreachable!("{} label carries no condition", label.kind()),
    }
}

fn take_children<S, const N: usize>(children: Vec<S>) -> [S; N] {
    match children.try_into() {
        Ok(array) => array,
        Err(children) => unreachable!("expected {} children, found {}", N, children.len()),
    }
}

// ── Tree-backed statement ──────────────────────────────────

/// Statement represented as an owned tree of labels
///
/// Serializable for inspection only; trees are built through the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    label: StatementLabel,
    children: Vec<Statement>,
}

impl Statement {
    /// Empty BLOCK
    pub fn new() -> Self {
        Statement {
            label: StatementLabel::Block,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &StatementLabel {
        &self.label
    }

    pub fn children(&self) -> &[Statement] {
        &self.children
    }

    pub fn condition(&self) -> Option<Condition> {
        self.label.condition()
    }

    pub fn instruction(&self) -> Option<&str> {
        self.label.instruction()
    }
}

impl Default for Statement {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementKernel for Statement {
    fn new_instance(&self) -> Self {
        Statement::new()
    }

    fn kind(&self) -> Kind {
        self.label.kind()
    }

    fn assemble(&mut self, label: StatementLabel, children: Vec<Self>) {
        assert!(
            label.accepts(children.iter().map(|c| c.kind())),
            "Violation of: children {:?} fit a {} statement",
            children.iter().map(|c| c.kind()).collect::<Vec<_>>(),
            label.kind()
        );
        self.label = label;
        self.children = children;
    }

    fn disassemble(&mut self) -> (StatementLabel, Vec<Self>) {
        let taken = std::mem::take(self);
        (taken.label, taken.children)
    }

    fn transfer_from(&mut self, source: Self) {
        *self = source;
    }
}
