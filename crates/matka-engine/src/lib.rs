//! Matka bet rules engine
//!
//! One consolidated, testable home for the three pieces of a numbers-betting
//! platform that carry real invariants:
//!
//! - `pattern`: classifies the numeric shape each bet type accepts and
//!   groups canonical pattis by digit-sum key for bulk-entry UIs
//! - `clock`: computes which betting phase (open, close-only, closed) a
//!   market is in at an instant, across a timezone-fixed daily cycle with
//!   midnight rollover
//! - `settle`: evaluates a market's declared results against a placed bet
//!   to decide pending/won/lost and the payout multiplier
//!
//! The engine is pure and synchronous: no I/O, no shared mutable state, no
//! money movement. Callers pass immutable market snapshots and a clock
//! instant and get values back; wallet ledgers, persistence, transport and
//! rendering all live outside.

pub mod clock;
pub mod pattern;
pub mod settle;
pub mod types;

pub use clock::{ClockConfig, IST_OFFSET_SECS};
pub use pattern::{
    canonical_pattis, classify, is_canonical_patti, sum_groups, sum_key, Classified, InvalidShape,
};
pub use settle::{evaluate, evaluate_all};
pub use types::*;
