//! Endpoint and settle timing.

use std::time::Duration;

/// Sheet script serving snapshot reads and accepting transactions. Override at build time with
/// `GOLFPOOL_ENDPOINT`.
pub const DEFAULT_ENDPOINT: &str =
    "https://script.google.com/macros/s/AKfycbxDwo6v2gt4OrDLE4RQp8cbygBoRJ8QWfX-2-gkLvo1gNCPuNmd9IPIawDDLxkEvdcl_A/exec";

/// A new row only needs inserting on the sheet side.
pub const REGISTER_SETTLE: SettlePlan = SettlePlan::new(1_500, 1_500, 4);
/// Bets wait longer: row and column totals are recomputed by the sheet.
pub const BET_SETTLE: SettlePlan = SettlePlan::new(3_000, 1_500, 4);

/// How long to wait after a write before re-reading, and how many reads to spend waiting for the
/// write to show up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlePlan {
    pub initial_delay: Duration,
    pub retry_every: Duration,
    pub max_attempts: u32,
}

impl SettlePlan {
    pub const fn new(initial_ms: u64, retry_ms: u64, max_attempts: u32) -> Self {
        Self {
            initial_delay: Duration::from_millis(initial_ms),
            retry_every: Duration::from_millis(retry_ms),
            max_attempts,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub endpoint: String,
    pub register_settle: SettlePlan,
    pub bet_settle: SettlePlan,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: option_env!("GOLFPOOL_ENDPOINT").unwrap_or(DEFAULT_ENDPOINT).to_string(),
            register_settle: REGISTER_SETTLE,
            bet_settle: BET_SETTLE,
        }
    }
}
