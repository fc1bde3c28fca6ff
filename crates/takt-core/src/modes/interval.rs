//! Interval (workout) derivation.
//!
//! Everything about the current phase falls out of integer division of
//! the raw elapsed value by the cycle length. Changing the config while
//! running legally shifts the derivation on the next tick; the abrupt
//! phase jump that can cause is accepted behavior.

use serde::{Deserialize, Serialize};

/// Minimum work phase length. The cycle length can therefore never be
/// zero and the phase division is always defined.
pub const MIN_WORK_MS: u64 = 1_000;

/// Fields are private so every config that exists, whether built in
/// code or deserialized off the wire, has passed through the clamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawIntervalConfig")]
pub struct IntervalConfig {
    work_ms: u64,
    rest_ms: u64,
    rounds: u32,
}

/// Unvalidated wire shape; only ever observed through `From`.
#[derive(Deserialize)]
struct RawIntervalConfig {
    work_ms: u64,
    rest_ms: u64,
    rounds: u32,
}

impl From<RawIntervalConfig> for IntervalConfig {
    fn from(raw: RawIntervalConfig) -> Self {
        Self::new(raw.work_ms, raw.rest_ms, raw.rounds)
    }
}

impl IntervalConfig {
    /// Build a config, clamping out-of-range values rather than
    /// erroring: work ≥ 1s, rounds ≥ 1.
    pub fn new(work_ms: u64, rest_ms: u64, rounds: u32) -> Self {
        Self {
            work_ms: work_ms.max(MIN_WORK_MS),
            rest_ms,
            rounds: rounds.max(1),
        }
    }

    pub fn work_ms(&self) -> u64 {
        self.work_ms
    }

    pub fn rest_ms(&self) -> u64 {
        self.rest_ms
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn set_work_ms(&mut self, work_ms: u64) {
        self.work_ms = work_ms.max(MIN_WORK_MS);
    }

    pub fn set_rest_ms(&mut self, rest_ms: u64) {
        self.rest_ms = rest_ms;
    }

    pub fn set_rounds(&mut self, rounds: u32) {
        self.rounds = rounds.max(1);
    }

    /// One work+rest pair.
    pub fn cycle_ms(&self) -> u64 {
        self.work_ms.saturating_add(self.rest_ms)
    }

    /// Exact completion boundary: `rounds * cycle`.
    pub fn total_ms(&self) -> u64 {
        self.cycle_ms().saturating_mul(self.rounds as u64)
    }
}

impl Default for IntervalConfig {
    /// Tabata-style default: 20s work, 10s rest, 8 rounds.
    fn default() -> Self {
        Self {
            work_ms: 20_000,
            rest_ms: 10_000,
            rounds: 8,
        }
    }
}

/// Where one elapsed value falls within the workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPhase {
    /// 0-based completed-cycle count; unclamped.
    pub round_index: u64,
    /// 1-based, clamped to never exceed the configured rounds.
    pub current_round: u32,
    pub in_cycle_ms: u64,
    pub is_work: bool,
    pub complete: bool,
    /// Time left in the current phase (work or rest).
    pub phase_remaining_ms: u64,
    /// What the display renders: phase remaining, or 0 once complete.
    pub display_ms: u64,
}

impl IntervalPhase {
    pub fn derive(elapsed_ms: u64, config: &IntervalConfig) -> Self {
        let cycle = config.cycle_ms();
        let round_index = elapsed_ms / cycle;
        let in_cycle_ms = elapsed_ms % cycle;
        let is_work = in_cycle_ms < config.work_ms;
        let complete = elapsed_ms >= config.total_ms();
        let phase_remaining_ms = if is_work {
            config.work_ms - in_cycle_ms
        } else {
            cycle - in_cycle_ms
        };
        Self {
            round_index,
            current_round: (round_index + 1).min(config.rounds as u64) as u32,
            in_cycle_ms,
            is_work,
            complete,
            phase_remaining_ms,
            display_ms: if complete { 0 } else { phase_remaining_ms },
        }
    }
}

/// Coarse lifecycle stage, derived like everything else.
///
/// `Setup → Running ⇄ Paused → Complete`; `Complete` holds until a
/// reset returns the timer to `Setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalStage {
    Setup,
    Running,
    Paused,
    Complete,
}

impl IntervalStage {
    pub fn derive(elapsed_ms: u64, running: bool, config: &IntervalConfig) -> Self {
        if elapsed_ms >= config.total_ms() {
            IntervalStage::Complete
        } else if elapsed_ms == 0 && !running {
            IntervalStage::Setup
        } else if running {
            IntervalStage::Running
        } else {
            IntervalStage::Paused
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabata() -> IntervalConfig {
        IntervalConfig::new(20_000, 10_000, 8)
    }

    #[test]
    fn rest_phase_mid_first_round() {
        let p = IntervalPhase::derive(25_000, &tabata());
        assert_eq!(p.round_index, 0);
        assert!(!p.is_work);
        assert_eq!(p.current_round, 1);
        assert!(!p.complete);
        assert_eq!(p.phase_remaining_ms, 5_000);
        assert_eq!(p.display_ms, 5_000);
    }

    #[test]
    fn work_phase_at_round_start() {
        let p = IntervalPhase::derive(30_000, &tabata());
        assert_eq!(p.round_index, 1);
        assert!(p.is_work);
        assert_eq!(p.current_round, 2);
        assert_eq!(p.phase_remaining_ms, 20_000);
    }

    #[test]
    fn completion_boundary() {
        let cfg = tabata();
        let p = IntervalPhase::derive(cfg.total_ms(), &cfg);
        assert!(p.complete);
        assert_eq!(p.round_index, 8);
        assert_eq!(p.current_round, 8);
        assert_eq!(p.display_ms, 0);

        let almost = IntervalPhase::derive(cfg.total_ms() - 1, &cfg);
        assert!(!almost.complete);
    }

    #[test]
    fn config_clamps() {
        let cfg = IntervalConfig::new(0, 0, 0);
        assert_eq!(cfg.work_ms(), MIN_WORK_MS);
        assert_eq!(cfg.rounds(), 1);
        assert_eq!(cfg.cycle_ms(), MIN_WORK_MS);

        let mut cfg = tabata();
        cfg.set_work_ms(10);
        assert_eq!(cfg.work_ms(), MIN_WORK_MS);
        cfg.set_rounds(0);
        assert_eq!(cfg.rounds(), 1);
        cfg.set_rest_ms(0);
        assert_eq!(cfg.rest_ms(), 0);
    }

    #[test]
    fn zeroed_wire_config_is_clamped_and_divisible() {
        let cfg: IntervalConfig =
            serde_json::from_str(r#"{"work_ms":0,"rest_ms":0,"rounds":0}"#).unwrap();
        assert_eq!(cfg.cycle_ms(), MIN_WORK_MS);

        // The phase division must stay defined for any config that can
        // exist.
        let p = IntervalPhase::derive(5_000, &cfg);
        assert_eq!(p.round_index, 5);
        assert!(p.complete);
        assert_eq!(p.current_round, 1);
    }

    #[test]
    fn stage_lifecycle() {
        let cfg = tabata();
        assert_eq!(IntervalStage::derive(0, false, &cfg), IntervalStage::Setup);
        assert_eq!(IntervalStage::derive(0, true, &cfg), IntervalStage::Running);
        assert_eq!(
            IntervalStage::derive(15_000, false, &cfg),
            IntervalStage::Paused
        );
        assert_eq!(
            IntervalStage::derive(cfg.total_ms(), false, &cfg),
            IntervalStage::Complete
        );
    }
}
