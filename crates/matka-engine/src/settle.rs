//! Settlement evaluator
//!
//! # Algorithm
//! 1. Derive `open_digit` / `close_digit` (digit-sum mod 10 of the declared
//!    pana) and `jodi` (their 2-char concatenation) where the results exist
//! 2. Gate on declaration per bet type and session - an undeclared result
//!    settles as `Pending`, never as a false loss
//! 3. Compare the classified bet number against the appropriate derived
//!    value by exact string equality
//! 4. On a win, look up the multiplier by (bet type, patti subtype) with a
//!    flagged fallback to the compiled-in defaults
//!
//! Declared-result presence is the gate for settlement, not the session
//! clock: a result recorded early still settles, a closed market without a
//! result stays pending. The evaluator returns values only - the caller's
//! ledger moves the money.

use tracing::{debug, warn};

use crate::pattern::{classify, sum_key};
use crate::types::{
    Bet, BetType, Market, PattiSubtype, PendingReason, RateTable, Session, SettlementOutcome,
};

/// Digit a declared 3-digit pana contributes to jodi and single-digit bets.
/// `None` when the stored number is absent or malformed - a malformed
/// declared number is treated as not declared, defensively.
fn pana_digit(number: Option<&String>) -> Option<u8> {
    number.and_then(|n| sum_key(n).ok())
}

/// Declared pana, validated to 3 digits. Malformed stored values count as
/// undeclared rather than producing false losses.
fn declared_pana(number: Option<&String>) -> Option<&str> {
    let n = number?;
    sum_key(n).ok()?;
    Some(n.as_str())
}

fn won(bet: &Bet, rates: &RateTable, subtype: Option<PattiSubtype>) -> SettlementOutcome {
    let lookup = rates.multiplier(bet.bet_type, subtype);
    if lookup.default_used {
        warn!(
            bet_type = ?bet.bet_type,
            multiplier = lookup.multiplier,
            "rate table has no usable entry, compiled-in default applied"
        );
    }
    SettlementOutcome::Won {
        multiplier: lookup.multiplier,
        payout: bet.amount.saturating_mul(u64::from(lookup.multiplier)),
        default_rate_used: lookup.default_used,
    }
}

fn settled(
    matched: bool,
    bet: &Bet,
    rates: &RateTable,
    subtype: Option<PattiSubtype>,
) -> SettlementOutcome {
    if matched {
        won(bet, rates, subtype)
    } else {
        SettlementOutcome::Lost
    }
}

fn pending(reason: PendingReason) -> SettlementOutcome {
    SettlementOutcome::Pending { reason }
}

/// Evaluate a settled (or partially settled) market against one bet.
///
/// Pure: consumes immutable snapshots, returns a fresh outcome, touches no
/// wallet and performs no I/O beyond tracing.
pub fn evaluate(market: &Market, bet: &Bet, rates: &RateTable) -> SettlementOutcome {
    // A bet whose stored number does not fit its type's shape is held for
    // review instead of being compared (and falsely lost).
    let classified = match classify(bet.bet_type, &bet.number) {
        Ok(c) => c,
        Err(e) => {
            warn!(bet_type = ?bet.bet_type, number = %bet.number, error = %e, "malformed bet number held as pending");
            return pending(PendingReason::MalformedBetNumber);
        }
    };
    let number = classified.normalized.as_str();

    let open_pana = declared_pana(market.opening_number.as_ref());
    let close_pana = declared_pana(market.closing_number.as_ref());
    let open_digit = pana_digit(market.opening_number.as_ref());
    let close_digit = pana_digit(market.closing_number.as_ref());

    debug!(bet_type = ?bet.bet_type, session = ?bet.session, ?open_pana, ?close_pana, "evaluating bet");

    match bet.bet_type {
        BetType::SingleDigit => {
            let declared = match bet.session {
                Session::Open => open_digit,
                Session::Close => close_digit,
            };
            match declared {
                Some(d) => settled(number == d.to_string(), bet, rates, None),
                None => pending(match bet.session {
                    Session::Open => PendingReason::AwaitingOpenResult,
                    Session::Close => PendingReason::AwaitingCloseResult,
                }),
            }
        }

        BetType::Jodi => {
            // Needs both sessions regardless of the bet's session tag.
            match (open_digit, close_digit) {
                (Some(o), Some(c)) => settled(number == format!("{o}{c}"), bet, rates, None),
                _ => pending(PendingReason::AwaitingBothResults),
            }
        }

        BetType::SinglePatti | BetType::DoublePatti | BetType::TriplePatti => {
            let declared = match bet.session {
                Session::Open => open_pana,
                Session::Close => close_pana,
            };
            match declared {
                Some(pana) => settled(number == pana, bet, rates, classified.subtype),
                None => pending(match bet.session {
                    Session::Open => PendingReason::AwaitingOpenResult,
                    Session::Close => PendingReason::AwaitingCloseResult,
                }),
            }
        }

        BetType::HalfSangamOpen => {
            // "PANA-DIGIT": opening pana + closing digit. The open result
            // alone gates evaluation; a pana mismatch loses outright, a pana
            // match still needs the close digit.
            let Some(open) = open_pana else {
                return pending(PendingReason::AwaitingOpenResult);
            };
            let (bet_pana, bet_digit) = match number.split_once('-') {
                Some(parts) => parts,
                None => return pending(PendingReason::MalformedBetNumber),
            };
            if bet_pana != open {
                return SettlementOutcome::Lost;
            }
            match close_digit {
                Some(c) => settled(bet_digit == c.to_string(), bet, rates, None),
                None => pending(PendingReason::AwaitingCloseResult),
            }
        }

        BetType::HalfSangamClose => {
            // "DIGIT-PANA": opening digit + closing pana. Needs both results.
            match (open_digit, close_pana) {
                (Some(o), Some(close)) => {
                    let expected = format!("{o}-{close}");
                    settled(number == expected, bet, rates, None)
                }
                _ => pending(PendingReason::AwaitingBothResults),
            }
        }

        BetType::FullSangam => {
            // "PANA-PANA": both panas, exact.
            match (open_pana, close_pana) {
                (Some(open), Some(close)) => {
                    let expected = format!("{open}-{close}");
                    settled(number == expected, bet, rates, None)
                }
                _ => pending(PendingReason::AwaitingBothResults),
            }
        }
    }
}

/// Evaluate every outstanding bet on a market, one outcome per bet.
///
/// A malformed bet settles as pending and never aborts the rest of the
/// batch.
pub fn evaluate_all(market: &Market, bets: &[Bet], rates: &RateTable) -> Vec<SettlementOutcome> {
    bets.iter().map(|bet| evaluate(market, bet, rates)).collect()
}
