//! Market session clock
//!
//! # Algorithm
//! 1. Resolve "today" as a calendar date in the configured civil timezone
//!    (deployments fix India Standard Time, +05:30, the default)
//! 2. `open_at` = today + opening time (start of day when unconfigured)
//! 3. `close_at` = today + closing time; if `close_at <= open_at` the
//!    session spans midnight and closes on the next civil day
//! 4. `last_bettable_at` = `close_at` - closure buffer
//! 5. Classify: past `last_bettable_at` -> closed; at or past `open_at` ->
//!    close-only; before `open_at` -> open
//!
//! A 23:00/00:30 market resolves to a ~90 minute window spanning midnight,
//! never a negative or near-24h one. For such markets an instant in the
//! early-morning tail belongs to the cycle that opened the previous civil
//! day: before local noon the previous day's cycle is the reference, from
//! noon onward today's. A missing closing time reports `closed` with a
//! reason - a misconfigured market fails safe to "no betting", it never
//! crashes a screen.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Timelike, Utc};
use tracing::debug;

use crate::types::{Market, MarketPhase, PhaseReason, PhaseVerdict};

/// Default civil timezone offset: India Standard Time, UTC+05:30.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Session clock configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockConfig {
    /// Fixed civil timezone all market times are interpreted in.
    pub tz_offset: FixedOffset,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tz_offset: FixedOffset::east_opt(IST_OFFSET_SECS)
                .expect("IST offset is within +/-24h"),
        }
    }
}

impl ClockConfig {
    /// Clock for an arbitrary fixed offset given in seconds east of UTC.
    /// Falls back to the IST default when the offset is out of range.
    pub fn with_offset_secs(secs: i32) -> Self {
        match FixedOffset::east_opt(secs) {
            Some(tz_offset) => Self { tz_offset },
            None => Self::default(),
        }
    }

    /// Compute the betting phase of `market` at `now`.
    ///
    /// Pure function of its inputs: callers own re-deriving the phase on a
    /// timer, the clock owns no scheduling.
    pub fn phase(&self, market: &Market, now: DateTime<Utc>) -> PhaseVerdict {
        let Some(closing_time) = market.closing_time else {
            return PhaseVerdict {
                phase: MarketPhase::Closed,
                reason: PhaseReason::NoClosingTime,
            };
        };
        let opening_time = market.opening_time.unwrap_or(NaiveTime::MIN);

        let local = now.with_timezone(&self.tz_offset).naive_local();
        let spans_midnight = closing_time <= opening_time;

        // Anchor date of the cycle under evaluation. For midnight-spanning
        // sessions, mornings still belong to the cycle that opened yesterday.
        let mut anchor = local.date();
        if spans_midnight && local.time().hour() < 12 {
            anchor = anchor.pred_opt().unwrap_or(anchor);
        }

        let open_at = anchor.and_time(opening_time);
        let mut close_at = anchor.and_time(closing_time);
        if spans_midnight {
            close_at += Duration::days(1);
        }

        let last_bettable_at = close_at - Duration::seconds(i64::from(market.bet_closure_buffer_secs));

        debug!(
            %open_at,
            %close_at,
            %last_bettable_at,
            now = %local,
            "session window computed"
        );

        // The boundary is inclusive of the last legal instant, exclusive
        // just after. A buffer longer than the open->close span puts
        // last_bettable_at before open_at; the ordering of these checks
        // still classifies that without special casing.
        if local > last_bettable_at {
            PhaseVerdict {
                phase: MarketPhase::Closed,
                reason: PhaseReason::PastLastBettable,
            }
        } else if local >= open_at {
            PhaseVerdict {
                phase: MarketPhase::CloseOnly,
                reason: PhaseReason::OpenSessionLocked,
            }
        } else {
            PhaseVerdict {
                phase: MarketPhase::Open,
                reason: PhaseReason::BeforeOpening,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn market(open: &str, close: &str, buffer: u32) -> Market {
        Market {
            opening_time: Some(open.parse().unwrap()),
            closing_time: Some(close.parse().unwrap()),
            bet_closure_buffer_secs: buffer,
            opening_number: None,
            closing_number: None,
        }
    }

    /// IST wall-clock instant converted to the UTC the clock consumes.
    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(IST_OFFSET_SECS)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn phase_at(m: &Market, at: DateTime<Utc>) -> MarketPhase {
        ClockConfig::default().phase(m, at).phase
    }

    #[test]
    fn test_normal_day_window() {
        let m = market("10:00:00", "12:00:00", 0);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 9, 0, 0)), MarketPhase::Open);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 10, 30, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 12, 0, 1)), MarketPhase::Closed);
    }

    #[test]
    fn test_open_boundary_is_inclusive_close_only() {
        let m = market("10:00:00", "12:00:00", 0);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 10, 0, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 9, 59, 59)), MarketPhase::Open);
    }

    #[test]
    fn test_buffer_boundary_last_legal_instant() {
        // 5 minute buffer: 11:55:00 is still bettable, 11:55:01 is not.
        let m = market("10:00:00", "12:00:00", 300);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 11, 55, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 11, 55, 1)), MarketPhase::Closed);
    }

    #[test]
    fn test_midnight_rollover_window() {
        // Open 23:00, close 00:30: a ~90 minute window spanning midnight.
        let m = market("23:00:00", "00:30:00", 0);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 22, 0, 0)), MarketPhase::Open);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 23, 15, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 3, 0, 20, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 3, 0, 45, 0)), MarketPhase::Closed);
    }

    #[test]
    fn test_close_equal_to_open_rolls_over() {
        let m = market("09:00:00", "09:00:00", 0);
        // 24h window: every instant from 09:00 on is close-only until the
        // next day's 09:00.
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 15, 0, 0)), MarketPhase::CloseOnly);
    }

    #[test]
    fn test_buffer_longer_than_span_never_panics() {
        // 2h window, 3h buffer: last bettable precedes opening.
        let m = market("10:00:00", "12:00:00", 3 * 3600);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 9, 30, 0)), MarketPhase::Closed);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 8, 0, 0)), MarketPhase::Open);
    }

    #[test]
    fn test_missing_closing_time_fails_safe() {
        let m = Market {
            opening_time: Some("10:00:00".parse().unwrap()),
            ..Market::default()
        };
        let verdict = ClockConfig::default().phase(&m, Utc::now());
        assert_eq!(verdict.phase, MarketPhase::Closed);
        assert_eq!(verdict.reason, PhaseReason::NoClosingTime);
    }

    #[test]
    fn test_missing_opening_time_defaults_to_start_of_day() {
        let m = Market {
            closing_time: Some("12:00:00".parse().unwrap()),
            ..Market::default()
        };
        // Never before open, so never fully Open.
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 0, 0, 0)), MarketPhase::CloseOnly);
        assert_eq!(phase_at(&m, ist(2026, 3, 2, 12, 0, 1)), MarketPhase::Closed);
    }

    #[test]
    fn test_timezone_offset_is_respected() {
        // 11:30 UTC is 17:00 IST but 11:30 civil at UTC+0.
        let m = market("10:00:00", "12:00:00", 0);
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 11, 30, 0).unwrap();
        assert_eq!(ClockConfig::default().phase(&m, at).phase, MarketPhase::Closed);
        assert_eq!(
            ClockConfig::with_offset_secs(0).phase(&m, at).phase,
            MarketPhase::CloseOnly
        );
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_default() {
        assert_eq!(ClockConfig::with_offset_secs(999_999), ClockConfig::default());
    }
}
