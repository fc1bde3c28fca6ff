//! Mode-specific configuration and derivation.
//!
//! Each mode is a pure function from `(elapsed, config)` to display
//! state. Nothing here stores a phase: recomputing from the raw elapsed
//! value on every observation is what keeps phase, round and remaining
//! time impossible to get stale.

mod countdown;
mod interval;
mod stopwatch;

pub use countdown::{CountdownConfig, CountdownView, ZeroLatch, DEFAULT_DURATION_MS, MAX_DURATION_MS};
pub use interval::{IntervalConfig, IntervalPhase, IntervalStage, MIN_WORK_MS};
pub use stopwatch::{splits, LapList};

use serde::{Deserialize, Serialize};

/// The three timer modes. Each owns an independent engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Countdown,
    Stopwatch,
    Interval,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Countdown => write!(f, "countdown"),
            Mode::Stopwatch => write!(f, "stopwatch"),
            Mode::Interval => write!(f, "interval"),
        }
    }
}
