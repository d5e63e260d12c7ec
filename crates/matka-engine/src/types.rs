//! Core types for the matka bet rules engine
//!
//! # Design Principles
//! 1. All bet numbers stay `String` end to end - leading zeros are significant
//!    ("07" is a valid Jodi, 7 is not)
//! 2. The engine never mutates a `Market` - it is a read-only snapshot owned
//!    and persisted elsewhere
//! 3. Every outcome is a value, never an exception - these types flow through
//!    UI render paths and batch settlement jobs alike
//! 4. Everything serializes, so rate tables and bet batches can come from any
//!    external configuration source

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Bet shapes
// ============================================================================

/// Closed enumeration of supported bet types.
///
/// Each type has a canonical number shape; see the `pattern` module for the
/// shape rules.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    /// 1 digit, 0-9
    SingleDigit,
    /// 2 digits, "00"-"99"
    Jodi,
    /// 3 digits, all distinct
    SinglePatti,
    /// 3 digits, exactly one repeated pair
    DoublePatti,
    /// 3 digits, all equal
    TriplePatti,
    /// "PANA-DIGIT": opening pana paired with a closing single digit
    HalfSangamOpen,
    /// "DIGIT-PANA": opening digit paired with a closing pana
    HalfSangamClose,
    /// "PANA-PANA": opening pana paired with closing pana
    FullSangam,
}

impl BetType {
    /// Composite shapes carry a `-` separator and span both sessions.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            BetType::HalfSangamOpen | BetType::HalfSangamClose | BetType::FullSangam
        )
    }

    /// Patti bet types expect a 3-digit number of a specific subtype.
    pub fn expected_subtype(&self) -> Option<PattiSubtype> {
        match self {
            BetType::SinglePatti => Some(PattiSubtype::Single),
            BetType::DoublePatti => Some(PattiSubtype::Double),
            BetType::TriplePatti => Some(PattiSubtype::Triple),
            _ => None,
        }
    }
}

/// Patti subtype, derived from the digit multiset of a 3-digit number.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PattiSubtype {
    /// All three digits distinct (120 canonical forms)
    Single,
    /// Exactly one repeated pair (90 canonical forms)
    Double,
    /// All three digits equal (10 forms)
    Triple,
}

/// The two daily result-declaration events of a market.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Open,
    Close,
}

// ============================================================================
// Market snapshot
// ============================================================================

/// Read-only market snapshot consumed by the engine.
///
/// Owned and persisted elsewhere; the engine never assumes it is fresher than
/// the instant it was read. Result numbers transition `None -> Some` exactly
/// once per session per draw day, enforced externally.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Market {
    /// Civil opening time (HH:MM[:SS]). Missing means start of the civil day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<NaiveTime>,

    /// Civil closing time. Missing means the market cannot accept bets at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<NaiveTime>,

    /// Seconds before closing time at which betting stops.
    #[serde(default)]
    pub bet_closure_buffer_secs: u32,

    /// Declared opening 3-digit number, if the open result is out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_number: Option<String>,

    /// Declared closing 3-digit number, if the close result is out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_number: Option<String>,
}

// ============================================================================
// Bet
// ============================================================================

/// A placed bet, input to settlement. Immutable once evaluated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bet {
    pub bet_type: BetType,

    /// Bet number string, shape per `bet_type`.
    pub number: String,

    /// Which session the bet targets. For sangam types the session is implied
    /// by the type; this field is ignored for them.
    pub session: Session,

    /// Stake in minor currency units.
    pub amount: u64,
}

// ============================================================================
// Session phase
// ============================================================================

/// Betting phase of a market at a given instant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarketPhase {
    /// Both open and close sessions are bettable.
    Open,
    /// Opening time has passed; only the close session may still be bet on.
    CloseOnly,
    /// Betting is over for this cycle.
    Closed,
}

impl MarketPhase {
    /// Sessions that may be offered to a bettor in this phase.
    ///
    /// This is the single home of the "closeOnly" special-casing - every
    /// surface (bulk forms, special forms, bid-option lists) derives its
    /// session choices from here.
    pub fn offerable_sessions(&self) -> &'static [Session] {
        match self {
            MarketPhase::Open => &[Session::Open, Session::Close],
            MarketPhase::CloseOnly => &[Session::Close],
            MarketPhase::Closed => &[],
        }
    }

    /// Whether a bet on the given session may be submitted in this phase.
    pub fn allows(&self, session: Session) -> bool {
        self.offerable_sessions().contains(&session)
    }
}

/// Machine-readable reason attached to a phase verdict.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseReason {
    /// Market has no configured closing time - fails safe to no betting.
    NoClosingTime,
    /// The last bettable instant has passed.
    PastLastBettable,
    /// Opening time has passed, close session still bettable.
    OpenSessionLocked,
    /// Before opening time, everything bettable.
    BeforeOpening,
}

/// Result of a phase computation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseVerdict {
    pub phase: MarketPhase,
    pub reason: PhaseReason,
}

// ============================================================================
// Rate table
// ============================================================================

/// Compiled-in default payout multipliers.
///
/// These reproduce the values of the existing system exactly and must not
/// drift; an external rate-configuration source may override any subset.
pub const DEFAULT_SINGLE_DIGIT_RATE: u32 = 10;
pub const DEFAULT_JODI_RATE: u32 = 100;
pub const DEFAULT_SINGLE_PATTI_RATE: u32 = 150;
pub const DEFAULT_DOUBLE_PATTI_RATE: u32 = 300;
pub const DEFAULT_TRIPLE_PATTI_RATE: u32 = 1000;
pub const DEFAULT_HALF_SANGAM_RATE: u32 = 5000;
pub const DEFAULT_FULL_SANGAM_RATE: u32 = 10_000;

/// Payout multiplier table keyed by bet type (and patti subtype).
///
/// Missing or zero entries fall back to the compiled-in defaults; the
/// fallback is flagged on the lookup so settlement can surface it instead of
/// silently paying 0 because of one missing config key.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RateTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_digit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jodi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_patti: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_patti: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triple_patti: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_sangam: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_sangam: Option<u32>,
}

/// Result of a rate lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLookup {
    pub multiplier: u32,
    /// True when the configured table had no usable entry and the compiled-in
    /// default was substituted.
    pub default_used: bool,
}

impl RateTable {
    /// A table with every entry explicitly set to the compiled-in default.
    /// Lookups against it never flag a fallback.
    pub fn defaults() -> Self {
        Self {
            single_digit: Some(DEFAULT_SINGLE_DIGIT_RATE),
            jodi: Some(DEFAULT_JODI_RATE),
            single_patti: Some(DEFAULT_SINGLE_PATTI_RATE),
            double_patti: Some(DEFAULT_DOUBLE_PATTI_RATE),
            triple_patti: Some(DEFAULT_TRIPLE_PATTI_RATE),
            half_sangam: Some(DEFAULT_HALF_SANGAM_RATE),
            full_sangam: Some(DEFAULT_FULL_SANGAM_RATE),
        }
    }

    /// Look up the multiplier for a winning bet.
    ///
    /// Patti bets are keyed by subtype - a triple patti pays far more than a
    /// single patti at the same stake. Half sangam open and close share one
    /// rate. A configured 0 counts as invalid and falls back, since 0 masks
    /// configuration bugs.
    pub fn multiplier(&self, bet_type: BetType, subtype: Option<PattiSubtype>) -> RateLookup {
        let (entry, default) = match (bet_type, subtype) {
            (BetType::SingleDigit, _) => (self.single_digit, DEFAULT_SINGLE_DIGIT_RATE),
            (BetType::Jodi, _) => (self.jodi, DEFAULT_JODI_RATE),
            (BetType::HalfSangamOpen | BetType::HalfSangamClose, _) => {
                (self.half_sangam, DEFAULT_HALF_SANGAM_RATE)
            }
            (BetType::FullSangam, _) => (self.full_sangam, DEFAULT_FULL_SANGAM_RATE),
            // Patti rates follow the classified subtype, not the nominal bet
            // type, so a patti bet always pays at its actual shape.
            (_, Some(PattiSubtype::Single)) | (BetType::SinglePatti, None) => {
                (self.single_patti, DEFAULT_SINGLE_PATTI_RATE)
            }
            (_, Some(PattiSubtype::Double)) | (BetType::DoublePatti, None) => {
                (self.double_patti, DEFAULT_DOUBLE_PATTI_RATE)
            }
            (_, Some(PattiSubtype::Triple)) | (BetType::TriplePatti, None) => {
                (self.triple_patti, DEFAULT_TRIPLE_PATTI_RATE)
            }
        };

        match entry {
            Some(rate) if rate > 0 => RateLookup {
                multiplier: rate,
                default_used: false,
            },
            _ => RateLookup {
                multiplier: default,
                default_used: true,
            },
        }
    }
}

// ============================================================================
// Settlement outcome
// ============================================================================

/// Why a bet is still pending.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    /// The open result the bet depends on is not declared yet.
    AwaitingOpenResult,
    /// The close result the bet depends on is not declared yet.
    AwaitingCloseResult,
    /// Both results are required and at least one is missing.
    AwaitingBothResults,
    /// The stored bet number does not match its bet type's shape - held for
    /// manual review rather than settled as a false loss.
    MalformedBetNumber,
}

/// Outcome of evaluating one bet against a market's declared results.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Result not yet declared for the relevant session(s).
    Pending { reason: PendingReason },

    /// Declared and did not match.
    Lost,

    /// Declared and matched.
    Won {
        multiplier: u32,
        /// Stake times multiplier, saturating. The caller's ledger applies
        /// it; the engine never touches a wallet.
        payout: u64,
        /// True when the rate came from the compiled-in fallback table.
        default_rate_used: bool,
    },
}

impl SettlementOutcome {
    pub fn is_won(&self) -> bool {
        matches!(self, SettlementOutcome::Won { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SettlementOutcome::Pending { .. })
    }

    /// Payout amount, 0 unless won.
    pub fn payout(&self) -> u64 {
        match self {
            SettlementOutcome::Won { payout, .. } => *payout,
            _ => 0,
        }
    }
}
