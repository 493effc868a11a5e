//! Dice notation parsing and rolling

use crate::DiceError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Maximum dice count accepted in a single term
pub(crate) const MAX_DICE: u32 = 1000;

/// A parsed dice expression such as "2d6+3" or "1d8+2d4-1"
///
/// An expression is a signed sum of terms, each either a dice roll
/// (`NdS`, with an implicit count of 1 when omitted) or a flat constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpression {
    terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    sign: i32,
    kind: TermKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TermKind {
    Dice { count: u32, sides: u32 },
    Flat(u32),
}

/// Result of rolling a dice expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    /// Signed sum of all dice and constants
    pub total: i32,
    /// Individual die results, in rolled order (constants excluded)
    pub rolls: Vec<i32>,
}

impl DiceExpression {
    /// Parse dice notation, equivalent to `str::parse`
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        notation.parse()
    }

    /// Roll the expression with the provided RNG
    pub fn roll<R: Rng>(&self, rng: &mut R) -> RollResult {
        let mut total: i64 = 0;
        let mut rolls = Vec::new();

        for term in &self.terms {
            match term.kind {
                TermKind::Dice { count, sides } => {
                    for _ in 0..count {
                        let die = rng.gen_range(1..=sides) as i32;
                        rolls.push(die);
                        total += i64::from(term.sign) * i64::from(die);
                    }
                }
                TermKind::Flat(value) => {
                    total += i64::from(term.sign) * i64::from(value);
                }
            }
        }

        RollResult {
            total: total.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            rolls,
        }
    }

    /// Minimum possible total for this expression
    pub fn minimum(&self) -> i32 {
        self.extreme(false)
    }

    /// Maximum possible total for this expression
    pub fn maximum(&self) -> i32 {
        self.extreme(true)
    }

    fn extreme(&self, high: bool) -> i32 {
        let mut total: i64 = 0;
        for term in &self.terms {
            let value: i64 = match term.kind {
                TermKind::Flat(v) => i64::from(v),
                TermKind::Dice { count, sides } => {
                    // A positive term contributes its largest face when
                    // maximizing; a negated term its smallest.
                    if (term.sign > 0) == high {
                        i64::from(count) * i64::from(sides)
                    } else {
                        i64::from(count)
                    }
                }
            };
            total += i64::from(term.sign) * value;
        }
        total.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(DiceError::Empty);
        }

        let mut terms = Vec::new();
        let mut rest = compact.as_str();
        let mut sign = 1;

        // Leading sign is allowed ("-2" or "+1d4")
        loop {
            let (term_str, next) = split_term(rest);
            if term_str.is_empty() {
                return Err(DiceError::InvalidTerm(rest.to_string()));
            }
            terms.push(parse_term(term_str, sign)?);

            match next {
                Some(('+', remainder)) => {
                    sign = 1;
                    rest = remainder;
                }
                Some(('-', remainder)) => {
                    sign = -1;
                    rest = remainder;
                }
                Some(_) => unreachable!("split_term only yields + or -"),
                None => break,
            }
        }

        Ok(DiceExpression { terms })
    }
}

/// Split off the leading term, returning the separator and remainder if any
fn split_term(input: &str) -> (&str, Option<(char, &str)>) {
    // Skip a leading sign character so "-2d6" parses as one negated term
    let search_from = usize::from(input.starts_with(['+', '-']));
    match input[search_from..].find(['+', '-']) {
        Some(offset) => {
            let at = search_from + offset;
            let sep = input.as_bytes()[at] as char;
            (&input[..at], Some((sep, &input[at + 1..])))
        }
        None => (input, None),
    }
}

fn parse_term(term: &str, outer_sign: i32) -> Result<Term, DiceError> {
    let (sign, body) = match term.strip_prefix('-') {
        Some(body) => (-outer_sign, body),
        None => (outer_sign, term.strip_prefix('+').unwrap_or(term)),
    };

    let invalid = || DiceError::InvalidTerm(term.to_string());

    match body.split_once(['d', 'D']) {
        Some((count_str, sides_str)) => {
            let count: u32 = if count_str.is_empty() {
                1
            } else {
                count_str.parse().map_err(|_| invalid())?
            };
            let sides: u32 = sides_str.parse().map_err(|_| invalid())?;
            if count == 0 {
                return Err(invalid());
            }
            if sides == 0 {
                return Err(DiceError::ZeroSides(term.to_string()));
            }
            if count > MAX_DICE {
                return Err(DiceError::TooManyDice(count));
            }
            Ok(Term {
                sign,
                kind: TermKind::Dice { count, sides },
            })
        }
        None => {
            let value: u32 = body.parse().map_err(|_| invalid())?;
            Ok(Term {
                sign,
                kind: TermKind::Flat(value),
            })
        }
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 || term.sign < 0 {
                f.write_str(if term.sign < 0 { "-" } else { "+" })?;
            }
            match term.kind {
                TermKind::Dice { count, sides } => write!(f, "{}d{}", count, sides)?,
                TermKind::Flat(value) => write!(f, "{}", value)?,
            }
        }
        Ok(())
    }
}
