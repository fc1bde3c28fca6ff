//! Stopwatch lap bookkeeping.
//!
//! Laps are append-only snapshots of the engine's elapsed value; splits
//! are derived, never stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LapList {
    laps: Vec<u64>,
}

impl LapList {
    /// Append a lap at the given elapsed value. Returns the lap's
    /// 1-based index and its split.
    pub fn record(&mut self, elapsed_ms: u64) -> (usize, u64) {
        let split = elapsed_ms.saturating_sub(self.laps.last().copied().unwrap_or(0));
        self.laps.push(elapsed_ms);
        (self.laps.len(), split)
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn splits(&self) -> Vec<u64> {
        splits(&self.laps)
    }
}

/// Delta between consecutive lap snapshots; the first split is measured
/// from zero.
pub fn splits(laps: &[u64]) -> Vec<u64> {
    let mut prev = 0u64;
    laps.iter()
        .map(|&lap| {
            let split = lap.saturating_sub(prev);
            prev = lap;
            split
        })
        .collect()
}
