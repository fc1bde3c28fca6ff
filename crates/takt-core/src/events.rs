//! Observable state transitions.
//!
//! Every control operation and every mode-policy decision produces an
//! `Event`. The CLI prints them as JSON; any other front end can
//! subscribe the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modes::{IntervalStage, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Elapsed time was overwritten directly (completion snap or caller
    /// adjustment).
    ElapsedSet {
        mode: Mode,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    /// Stopwatch lap recorded. `split_ms` is the delta to the previous
    /// lap (or to zero for the first).
    LapRecorded {
        index: usize,
        elapsed_ms: u64,
        split_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown crossed zero into overtime. One-shot per crossing.
    CountdownReachedZero {
        duration_ms: u64,
        overtime_ms: u64,
        at: DateTime<Utc>,
    },
    /// Interval workout finished; elapsed has been snapped to the exact
    /// completion boundary.
    IntervalCompleted {
        rounds: u32,
        total_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownSnapshot {
        running: bool,
        duration_ms: u64,
        remaining_ms: i64,
        overtime: bool,
        display_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchSnapshot {
        running: bool,
        elapsed_ms: u64,
        laps: Vec<u64>,
        at: DateTime<Utc>,
    },
    IntervalSnapshot {
        running: bool,
        stage: IntervalStage,
        is_work: bool,
        current_round: u32,
        rounds: u32,
        phase_remaining_ms: u64,
        display_ms: u64,
        at: DateTime<Utc>,
    },
}
