//! BL Tokenizer — converts BL text into a token queue
//!
//! Handles: keywords, identifiers, condition names, `#` line comments.
//! Tokens are kept as plain strings; classification happens through the
//! predicates below so the parser can decide on one token of lookahead.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token queue
//! - The queue always ends with exactly one [`END_OF_INPUT`] sentinel
//! - Never fails: stray characters become single-character tokens that
//!   no predicate accepts, so they surface as parse errors

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::parser::condition::Condition;

/// End-of-input sentinel appended to every token queue
pub const END_OF_INPUT: &str = "### END OF INPUT ###";

/// Reserved words of the BL grammar (case-sensitive)
pub const KEYWORDS: [&str; 10] = [
    "PROGRAM",
    "IS",
    "BEGIN",
    "END",
    "INSTRUCTION",
    "IF",
    "THEN",
    "ELSE",
    "WHILE",
    "DO",
];

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token text with its source position, if it came from source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub text: String,
    pub span: Option<Span>,
}

/// Token classes, as reported by [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Condition,
    EndOfInput,
    Error,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Condition => "CONDITION",
            TokenKind::EndOfInput => "END_OF_INPUT",
            TokenKind::Error => "ERROR",
        };
        f.write_str(name)
    }
}

// ── Classification predicates ──────────────────────────────

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

pub fn is_condition(s: &str) -> bool {
    Condition::ALL.iter().any(|c| c.as_str() == s)
}

/// Letter followed by letters, digits or `-`, and neither keyword nor condition
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !is_keyword(s)
        && !is_condition(s)
}

pub fn classify(s: &str) -> TokenKind {
    if s == END_OF_INPUT {
        TokenKind::EndOfInput
    } else if is_keyword(s) {
        TokenKind::Keyword
    } else if is_condition(s) {
        TokenKind::Condition
    } else if is_identifier(s) {
        TokenKind::Identifier
    } else {
        TokenKind::Error
    }
}

// ── Token queue ────────────────────────────────────────────

/// FIFO of tokens ending in the [`END_OF_INPUT`] sentinel
///
/// Consumption is front-only. The sentinel is never removed: dequeuing at
/// the sentinel returns it and leaves it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenQueue {
    tokens: VecDeque<SpannedToken>,
}

impl TokenQueue {
    /// Build a queue from bare token strings, appending the sentinel
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut queue: VecDeque<SpannedToken> = tokens
            .into_iter()
            .map(|t| SpannedToken {
                text: t.into(),
                span: None,
            })
            .collect();
        queue.push_back(SpannedToken {
            text: END_OF_INPUT.to_string(),
            span: None,
        });
        TokenQueue { tokens: queue }
    }

    /// Peek at the front token without consuming it
    pub fn front(&self) -> &str {
        self.tokens
            .front()
            .map(|t| t.text.as_str())
            .unwrap_or(END_OF_INPUT)
    }

    pub fn front_span(&self) -> Option<Span> {
        self.tokens.front().and_then(|t| t.span)
    }

    /// Remove and return the front token (the sentinel stays in place)
    pub fn dequeue(&mut self) -> String {
        if self.is_at_end() {
            return END_OF_INPUT.to_string();
        }
        match self.tokens.pop_front() {
            Some(token) => {
                tracing::trace!(token = %token.text, "dequeue");
                token.text
            }
            None => END_OF_INPUT.to_string(),
        }
    }

    /// True when only the sentinel is left
    pub fn is_at_end(&self) -> bool {
        self.front() == END_OF_INPUT
    }

    /// Number of tokens, sentinel included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter()
    }
}

// ── Tokenizer ──────────────────────────────────────────────

/// Tokenizer for BL source text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, appending the sentinel
    pub fn tokenize(&mut self) -> TokenQueue {
        let mut tokens = VecDeque::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push_back(SpannedToken {
                    text: END_OF_INPUT.to_string(),
                    span: Some(self.current_span()),
                });
                break;
            }

            tokens.push_back(self.next_token());
        }

        TokenQueue { tokens }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek() {
                if ch.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() == Some('#') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    fn next_token(&mut self) -> SpannedToken {
        let span = self.current_span();
        let mut text = String::new();

        match self.advance() {
            Some(c) if is_word_char(c) => {
                text.push(c);
                while let Some(ch) = self.peek() {
                    if !is_word_char(ch) {
                        break;
                    }
                    text.push(ch);
                    self.advance();
                }
            }
            Some(c) => text.push(c),
            None => {}
        }

        SpannedToken {
            text,
            span: Some(span),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Tokenize `text` into a queue terminated by the sentinel
pub fn tokenize(text: &str) -> TokenQueue {
    Tokenizer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).iter().map(|t| t.text.clone()).collect()
    }

    // ── Splitting ──────────────────────────────────────

    #[test]
    fn test_tokenize_keywords_and_identifiers() {
        assert_eq!(
            texts("PROGRAM walk IS BEGIN move END walk"),
            vec!["PROGRAM", "walk", "IS", "BEGIN", "move", "END", "walk", END_OF_INPUT]
        );
    }

    #[test]
    fn test_tokenize_hyphenated_condition() {
        assert_eq!(
            texts("IF next-is-not-empty THEN"),
            vec!["IF", "next-is-not-empty", "THEN", END_OF_INPUT]
        );
    }

    #[test]
    fn test_stray_characters_are_single_tokens() {
        assert_eq!(texts("a;;b"), vec!["a", ";", ";", "b", END_OF_INPUT]);
    }

    #[test]
    fn test_skip_comments() {
        assert_eq!(
            texts("# header\nmove # trailing\n# footer"),
            vec!["move", END_OF_INPUT]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(texts(""), vec![END_OF_INPUT]);
        assert_eq!(texts("  \n\t \n"), vec![END_OF_INPUT]);
    }

    // ── Span tracking ──────────────────────────────────

    #[test]
    fn test_span_tracking() {
        let queue = tokenize("BEGIN\n  move\nEND");
        let spans: Vec<Span> = queue.iter().filter_map(|t| t.span).collect();
        assert_eq!(spans[0], Span { line: 1, column: 1, offset: 0 });
        assert_eq!(spans[1], Span { line: 2, column: 3, offset: 8 });
        assert_eq!(spans[2], Span { line: 3, column: 1, offset: 13 });
    }

    // ── Predicates ─────────────────────────────────────

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("move"));
        assert!(is_identifier("turn-around2"));
        assert!(is_identifier("FindObstacle"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("-x"));
        assert!(!is_identifier("IF"));
        assert!(!is_identifier("random"));
        assert!(!is_identifier("next-is-wall"));
        assert!(!is_identifier(""));
        assert!(!is_identifier(END_OF_INPUT));
    }

    #[test]
    fn test_is_condition() {
        assert!(is_condition("next-is-empty"));
        assert!(is_condition("true"));
        assert!(!is_condition("TRUE"));
        assert!(!is_condition("next_is_empty"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("WHILE"), TokenKind::Keyword);
        assert_eq!(classify("infect"), TokenKind::Identifier);
        assert_eq!(classify("random"), TokenKind::Condition);
        assert_eq!(classify(END_OF_INPUT), TokenKind::EndOfInput);
        assert_eq!(classify("@"), TokenKind::Error);
    }

    // ── Queue ──────────────────────────────────────────

    #[test]
    fn test_queue_sentinel_is_never_removed() {
        let mut queue = TokenQueue::from_tokens(["move"]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), "move");
        assert!(queue.is_at_end());
        assert_eq!(queue.dequeue(), END_OF_INPUT);
        assert_eq!(queue.dequeue(), END_OF_INPUT);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.front(), END_OF_INPUT);
    }

    #[test]
    fn test_from_tokens_has_no_spans() {
        let queue = TokenQueue::from_tokens(vec!["IF".to_string()]);
        assert_eq!(queue.front(), "IF");
        assert_eq!(queue.front_span(), None);
    }

    #[test]
    fn test_tokenize_determinism_100_iterations() {
        let input = "PROGRAM p IS\n  INSTRUCTION one IS move END one\nBEGIN one END p";
        let first = tokenize(input);
        for i in 0..100 {
            assert_eq!(first, tokenize(input), "Determinism failure at iteration {}", i);
        }
    }
}
