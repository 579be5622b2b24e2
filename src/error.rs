use std::fmt;

use serde::{Deserialize, Serialize};

// フリテンの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuritenKind {
    Permanent, // 自分の捨て牌に和了牌がある
    Temporary, // 同巡内の見逃し
    Riichi,    // リーチ後の見逃し
}

impl fmt::Display for FuritenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuritenKind::Permanent => write!(f, "permanent"),
            FuritenKind::Temporary => write!(f, "temporary"),
            FuritenKind::Riichi => write!(f, "riichi"),
        }
    }
}

/// Errors raised while adjudicating a round.
///
/// Everything except `InvariantViolation` is a rejected request: the engine
/// substitutes a fallback and the round keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    IllegalAction(String),
    NoApplicableYaku,
    FuritenViolation(FuritenKind),
    InvariantViolation(String),
}

impl RuleError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RuleError::InvariantViolation(_))
    }

    pub fn illegal(msg: impl Into<String>) -> Self {
        RuleError::IllegalAction(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        RuleError::InvariantViolation(msg.into())
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::IllegalAction(msg) => write!(f, "illegal action: {}", msg),
            RuleError::NoApplicableYaku => write!(f, "no applicable yaku"),
            RuleError::FuritenViolation(kind) => write!(f, "ron rejected: {} furiten", kind),
            RuleError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for RuleError {}

pub type RuleResult<T = ()> = Result<T, RuleError>;
