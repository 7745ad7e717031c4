//! Operator definitions for qualifiers.

use serde::{Deserialize, Serialize};

/// Operators a host may offer for push-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // Comparison
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,

    // POSIX regular expressions
    #[serde(rename = "~")]
    Match,
    #[serde(rename = "~*")]
    IMatch,
    #[serde(rename = "!~")]
    NotMatch,
    #[serde(rename = "!~*")]
    NotIMatch,

    // SQL LIKE
    #[serde(rename = "~~")]
    Like,
    #[serde(rename = "~~*")]
    ILike,
    #[serde(rename = "!~~")]
    NotLike,
    #[serde(rename = "!~~*")]
    NotILike,
}

impl Operator {
    /// Every operator, longest symbol first so that prefix matching picks
    /// `!~~*` before `!~`.
    pub const ALL: [Operator; 14] = [
        Operator::NotILike,
        Operator::NotLike,
        Operator::NotIMatch,
        Operator::ILike,
        Operator::Like,
        Operator::NotMatch,
        Operator::IMatch,
        Operator::Ne,
        Operator::Le,
        Operator::Ge,
        Operator::Match,
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
    ];

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Match => "~",
            Operator::IMatch => "~*",
            Operator::NotMatch => "!~",
            Operator::NotIMatch => "!~*",
            Operator::Like => "~~",
            Operator::ILike => "~~*",
            Operator::NotLike => "!~~",
            Operator::NotILike => "!~~*",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.as_str() == symbol)
    }

    /// LIKE family (`~~`, `~~*`, `!~~`, `!~~*`)
    pub fn is_like(&self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::ILike | Operator::NotLike | Operator::NotILike
        )
    }

    /// POSIX regex family (`~`, `~*`, `!~`, `!~*`)
    pub fn is_regex(&self) -> bool {
        matches!(
            self,
            Operator::Match | Operator::IMatch | Operator::NotMatch | Operator::NotIMatch
        )
    }

    /// Whether a pattern operator is negated
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            Operator::NotMatch | Operator::NotIMatch | Operator::NotLike | Operator::NotILike
        )
    }

    /// Whether a pattern operator ignores case
    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Operator::IMatch | Operator::NotIMatch | Operator::ILike | Operator::NotILike
        )
    }
}
