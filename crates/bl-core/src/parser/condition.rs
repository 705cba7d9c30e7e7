//! BL sensor conditions and the condition resolver

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// Primitive boolean sensor predicates tested by IF, IF_ELSE and WHILE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    NextIsEmpty,
    NextIsNotEmpty,
    NextIsEnemy,
    NextIsNotEnemy,
    NextIsFriend,
    NextIsNotFriend,
    NextIsWall,
    NextIsNotWall,
    Random,
    True,
}

impl Condition {
    pub const ALL: [Condition; 10] = [
        Condition::NextIsEmpty,
        Condition::NextIsNotEmpty,
        Condition::NextIsEnemy,
        Condition::NextIsNotEnemy,
        Condition::NextIsFriend,
        Condition::NextIsNotFriend,
        Condition::NextIsWall,
        Condition::NextIsNotWall,
        Condition::Random,
        Condition::True,
    ];

    /// Canonical source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::NextIsEmpty => "next-is-empty",
            Condition::NextIsNotEmpty => "next-is-not-empty",
            Condition::NextIsEnemy => "next-is-enemy",
            Condition::NextIsNotEnemy => "next-is-not-enemy",
            Condition::NextIsFriend => "next-is-friend",
            Condition::NextIsNotFriend => "next-is-not-friend",
            Condition::NextIsWall => "next-is-wall",
            Condition::NextIsNotWall => "next-is-not-wall",
            Condition::Random => "random",
            Condition::True => "true",
        }
    }

    fn screaming_name(self) -> &'static str {
        match self {
            Condition::NextIsEmpty => "NEXT_IS_EMPTY",
            Condition::NextIsNotEmpty => "NEXT_IS_NOT_EMPTY",
            Condition::NextIsEnemy => "NEXT_IS_ENEMY",
            Condition::NextIsNotEnemy => "NEXT_IS_NOT_ENEMY",
            Condition::NextIsFriend => "NEXT_IS_FRIEND",
            Condition::NextIsNotFriend => "NEXT_IS_NOT_FRIEND",
            Condition::NextIsWall => "NEXT_IS_WALL",
            Condition::NextIsNotWall => "NEXT_IS_NOT_WALL",
            Condition::Random => "RANDOM",
            Condition::True => "TRUE",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_condition(s)
    }
}

/// Resolve a condition token.
///
/// Matching ignores case and treats `-` and `_` alike, so `next-is-empty`
/// and `NEXT_IS_EMPTY` resolve to the same value. Callers check
/// [`is_condition`](crate::parser::tokenizer::is_condition) first; an
/// unknown token is still reported rather than defaulted.
pub fn parse_condition(token: &str) -> crate::Result<Condition> {
    let name = token.replace('-', "_").to_uppercase();
    Condition::ALL
        .into_iter()
        .find(|c| c.screaming_name() == name)
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidCondition,
                format!("\"{}\" is not a BL condition", token),
                None,
            )
        })
}
