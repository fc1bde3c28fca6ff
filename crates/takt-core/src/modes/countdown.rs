//! Countdown derivation.
//!
//! A countdown never stops itself: past zero the remaining value goes
//! negative and keeps going (overtime) until the user pauses or resets.
//! The display shows the magnitude either way.

use serde::{Deserialize, Serialize};

/// Default duration: 5 minutes.
pub const DEFAULT_DURATION_MS: u64 = 5 * 60 * 1000;

/// Largest representable duration: `remaining_ms` is signed, so the
/// duration must fit in `i64` to keep its sign meaningful.
pub const MAX_DURATION_MS: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub duration_ms: u64,
}

impl CountdownConfig {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms: duration_ms.min(MAX_DURATION_MS),
        }
    }

    /// Set the duration from a minutes value as entered by the user.
    /// NaN or negative input leaves the prior duration unchanged;
    /// absurdly large input saturates at [`MAX_DURATION_MS`].
    pub fn set_duration_minutes(&mut self, minutes: f64) {
        if !minutes.is_finite() || minutes < 0.0 {
            return;
        }
        self.duration_ms = ((minutes * 60_000.0) as u64).min(MAX_DURATION_MS);
    }

    /// Adjust the duration by a signed step, clamping at zero and at
    /// [`MAX_DURATION_MS`].
    pub fn adjust_ms(&mut self, delta_ms: i64) {
        self.duration_ms = self
            .duration_ms
            .saturating_add_signed(delta_ms)
            .min(MAX_DURATION_MS);
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// Presentation-ready countdown state for one elapsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownView {
    /// Signed: negative once in overtime.
    pub remaining_ms: i64,
    pub overtime: bool,
    /// Magnitude of `remaining_ms`, what the display renders.
    pub display_ms: u64,
}

impl CountdownView {
    pub fn derive(elapsed_ms: u64, config: &CountdownConfig) -> Self {
        // Widen before subtracting: a duration near u64::MAX (settable
        // through the pub field) must saturate, not wrap negative.
        let remaining = config.duration_ms as i128 - elapsed_ms as i128;
        let remaining_ms = remaining.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        Self {
            remaining_ms,
            overtime: remaining_ms < 0,
            display_ms: remaining_ms.unsigned_abs(),
        }
    }
}

/// One-shot zero-crossing trigger.
///
/// Fires once when remaining reaches zero or below while running, then
/// stays quiet until remaining returns above zero (reset, or the user
/// adds time). If remaining is already non-positive at the first
/// observation after a start, the first tick fires it retroactively;
/// that is the documented behavior, not a defect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroLatch {
    fired: bool,
}

impl ZeroLatch {
    /// Observe the current remaining value. Returns `true` exactly once
    /// per crossing into non-positive territory while running.
    pub fn observe(&mut self, remaining_ms: i64, running: bool) -> bool {
        if remaining_ms > 0 {
            self.fired = false;
            return false;
        }
        if self.fired || !running {
            return false;
        }
        self.fired = true;
        true
    }
}
