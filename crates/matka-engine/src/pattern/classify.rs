//! Bet number classification
//!
//! # Algorithm
//! 1. Trim the raw input (composite shapes are split on `-` first, each side
//!    trimmed independently)
//! 2. Reject non-digit characters and wrong digit counts for the shape
//! 3. For 3-digit pattis, derive the subtype from the digit multiset:
//!    all distinct -> Single, exactly one pair -> Double, all equal -> Triple
//!
//! Subtyping is permutation-invariant: "211" and "112" both classify as
//! Double. Canonical ordering is the concern of the `groups` module, not of
//! classification.

use thiserror::Error;

use crate::types::{BetType, PattiSubtype};

/// Rejection reasons for a malformed bet number.
///
/// Always recoverable - surfaced to the caller as "not valid, try again",
/// never raised as a panic that could abort a batch or a render.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidShape {
    #[error("empty bet number")]
    Empty,

    #[error("expected {expected} digit(s), got {got}")]
    WrongDigitCount { expected: usize, got: usize },

    #[error("non-digit character in '{input}'")]
    NonDigit { input: String },

    #[error("composite bet number must have exactly one '-' separator")]
    BadSeparator,

    #[error("expected a {expected:?} patti, got a {got:?} patti")]
    SubtypeMismatch {
        expected: PattiSubtype,
        got: PattiSubtype,
    },
}

/// A validated bet number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub bet_type: BetType,
    /// Trimmed form; composite shapes re-joined as "LEFT-RIGHT".
    pub normalized: String,
    /// Patti subtype for the three patti bet types, `None` otherwise.
    pub subtype: Option<PattiSubtype>,
}

/// Parse a side of a bet number into digits, enforcing an exact count.
fn parse_digits(part: &str, expected: usize) -> Result<Vec<u8>, InvalidShape> {
    let part = part.trim();
    if part.is_empty() {
        return Err(InvalidShape::Empty);
    }
    if part.chars().any(|c| !c.is_ascii_digit()) {
        return Err(InvalidShape::NonDigit {
            input: part.to_string(),
        });
    }
    if part.len() != expected {
        return Err(InvalidShape::WrongDigitCount {
            expected,
            got: part.len(),
        });
    }
    Ok(part.bytes().map(|b| b - b'0').collect())
}

/// Subtype of a 3-digit patti from its digit multiset.
///
/// Every 3-digit string matches exactly one subtype - there is no "two
/// pairs" case in 3 digits, so no invalid-shape residue exists here.
pub fn patti_subtype(digits: [u8; 3]) -> PattiSubtype {
    let [a, b, c] = digits;
    if a == b && b == c {
        PattiSubtype::Triple
    } else if a == b || b == c || a == c {
        PattiSubtype::Double
    } else {
        PattiSubtype::Single
    }
}

/// Digit-sum key of a 3-digit pana: `sum(digits) mod 10`.
///
/// Used to bucket pattis into their ten sum groups and to derive the single
/// digit a declared pana contributes to jodis and single-digit bets.
pub fn sum_key(pana: &str) -> Result<u8, InvalidShape> {
    let digits = parse_digits(pana, 3)?;
    Ok((digits.iter().map(|&d| d as u32).sum::<u32>() % 10) as u8)
}

/// Validate a pana side and hand back (normalized, subtype).
fn classify_pana(part: &str) -> Result<(String, PattiSubtype), InvalidShape> {
    let digits = parse_digits(part, 3)?;
    let subtype = patti_subtype([digits[0], digits[1], digits[2]]);
    Ok((part.trim().to_string(), subtype))
}

/// Validate a single-digit side.
fn classify_digit(part: &str) -> Result<String, InvalidShape> {
    parse_digits(part, 1)?;
    Ok(part.trim().to_string())
}

/// Split a composite bet number on its separator.
fn split_composite(raw: &str) -> Result<(&str, &str), InvalidShape> {
    let mut parts = raw.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Ok((left, right)),
        _ => Err(InvalidShape::BadSeparator),
    }
}

/// Decide whether a candidate number string is valid for a bet type.
///
/// Composite shapes classify each side independently and are valid only if
/// both sides are.
pub fn classify(bet_type: BetType, raw: &str) -> Result<Classified, InvalidShape> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InvalidShape::Empty);
    }

    match bet_type {
        BetType::SingleDigit => {
            let normalized = classify_digit(raw)?;
            Ok(Classified {
                bet_type,
                normalized,
                subtype: None,
            })
        }

        BetType::Jodi => {
            parse_digits(raw, 2)?;
            Ok(Classified {
                bet_type,
                normalized: raw.to_string(),
                subtype: None,
            })
        }

        BetType::SinglePatti | BetType::DoublePatti | BetType::TriplePatti => {
            let (normalized, subtype) = classify_pana(raw)?;
            let expected = bet_type
                .expected_subtype()
                .unwrap_or(subtype);
            if subtype != expected {
                return Err(InvalidShape::SubtypeMismatch {
                    expected,
                    got: subtype,
                });
            }
            Ok(Classified {
                bet_type,
                normalized,
                subtype: Some(subtype),
            })
        }

        BetType::HalfSangamOpen => {
            // Opening pana paired with a closing single digit: "PANA-DIGIT"
            let (left, right) = split_composite(raw)?;
            let (pana, _) = classify_pana(left)?;
            let digit = classify_digit(right)?;
            Ok(Classified {
                bet_type,
                normalized: format!("{pana}-{digit}"),
                subtype: None,
            })
        }

        BetType::HalfSangamClose => {
            // Opening digit paired with a closing pana: "DIGIT-PANA"
            let (left, right) = split_composite(raw)?;
            let digit = classify_digit(left)?;
            let (pana, _) = classify_pana(right)?;
            Ok(Classified {
                bet_type,
                normalized: format!("{digit}-{pana}"),
                subtype: None,
            })
        }

        BetType::FullSangam => {
            // Opening pana paired with closing pana: "PANA-PANA"
            let (left, right) = split_composite(raw)?;
            let (open_pana, _) = classify_pana(left)?;
            let (close_pana, _) = classify_pana(right)?;
            Ok(Classified {
                bet_type,
                normalized: format!("{open_pana}-{close_pana}"),
                subtype: None,
            })
        }
    }
}
