//! Number pattern classification and canonical sum groups
//!
//! # Components
//! - `classify`: shape validation and patti subtyping for every bet type
//! - `groups`: canonical patti sets and their ten digit-sum groups, generated
//!   by rule (the hand-maintained literal lists of the old system survive
//!   only as golden test fixtures)

mod classify;
pub mod groups;

pub use classify::{classify, patti_subtype, sum_key, Classified, InvalidShape};
pub use groups::{canonical_pattis, is_canonical_patti, sum_groups};
