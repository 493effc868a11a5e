//! rules_core - Dice expressions, ability checks, and score modifiers
//!
//! This library provides the table-rules math consumed by the encounter
//! tracker:
//! - DiceExpression: parsed dice notation ("2d6+3") that can be rolled
//! - ability_check: d20 checks with advantage or disadvantage
//! - modifier_from_score: ability score to modifier conversion
//!
//! All rolling takes an explicit `&mut impl Rng` so callers can supply a
//! seeded generator for deterministic results.

mod check;
mod dice;

pub use check::{ability_check, modifier_from_score, Advantage};
pub use dice::{DiceExpression, RollResult};

use thiserror::Error;

/// Error parsing a dice expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,
    #[error("invalid term '{0}'")]
    InvalidTerm(String),
    #[error("die must have at least one side in '{0}'")]
    ZeroSides(String),
    #[error("dice count {0} exceeds the maximum of 1000")]
    TooManyDice(u32),
}
