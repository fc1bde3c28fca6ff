//! Timer engine implementation.
//!
//! The engine is a wall-clock-delta state machine. It owns no thread and
//! never blocks: the caller (normally the [`ModeCoordinator`]) pumps
//! `tick()` whenever the tick source fires, and the engine recomputes
//! elapsed time from two wall-clock reads. Tick arrival cadence therefore
//! affects only how often the published value refreshes, never its
//! correctness.
//!
//! ## State
//!
//! ```text
//! elapsed = committed + (running ? now - session_start : 0)
//! ```
//!
//! `committed` holds the sum of all prior running sessions; a running
//! session is folded into it on `pause()`. The published `elapsed` is
//! frozen while paused.
//!
//! [`ModeCoordinator`]: crate::coordinator::ModeCoordinator

use chrono::Utc;

use crate::events::Event;
use crate::modes::Mode;

/// Elapsed-time bookkeeping for one timer instance.
///
/// One engine exists per mode; the engine itself knows nothing about
/// countdown or interval semantics. The `Mode` it carries is only an
/// event label.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: Mode,
    /// Elapsed time accumulated from all prior sessions.
    committed_ms: u64,
    /// Wall clock (ms since epoch) when the current session began.
    /// `None` while not running.
    session_start_ms: Option<u64>,
    running: bool,
    /// Last published elapsed value. Recomputed per tick while running,
    /// frozen while paused.
    elapsed_ms: u64,
}

impl TimerEngine {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            committed_ms: 0,
            session_start_ms: None,
            running: false,
            elapsed_ms: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a running session. No-op while already running, so calling
    /// twice cannot double-count the gap between the calls.
    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    /// Freeze elapsed time, folding the current session into the
    /// committed total. No-op while not running.
    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    /// Unconditionally return to zero, stopped.
    pub fn reset(&mut self) -> Option<Event> {
        self.committed_ms = 0;
        self.session_start_ms = None;
        self.running = false;
        self.elapsed_ms = 0;
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Overwrite the committed total and the published value without
    /// touching the running flag. While running, the in-flight session
    /// resumes accruing on top of `ms` at the next tick.
    pub fn set_elapsed(&mut self, ms: u64) -> Option<Event> {
        self.committed_ms = ms;
        self.elapsed_ms = ms;
        Some(Event::ElapsedSet {
            mode: self.mode,
            elapsed_ms: ms,
            at: Utc::now(),
        })
    }

    /// Recompute and return the published elapsed value. While paused
    /// this is a read: a tick that was already in flight when `pause()`
    /// landed changes nothing.
    pub fn tick(&mut self) -> u64 {
        self.tick_at(now_ms())
    }

    // ── Clock-explicit variants ──────────────────────────────────────
    // The public commands read the real clock; these take it as an
    // argument so tests can drive deterministic timelines.

    pub(crate) fn start_at(&mut self, now: u64) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.session_start_ms = Some(now);
        Some(Event::TimerStarted {
            mode: self.mode,
            elapsed_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    pub(crate) fn pause_at(&mut self, now: u64) -> Option<Event> {
        if !self.running {
            return None;
        }
        if let Some(start) = self.session_start_ms.take() {
            self.committed_ms = self
                .committed_ms
                .saturating_add(now.saturating_sub(start));
        }
        self.running = false;
        self.elapsed_ms = self.committed_ms;
        Some(Event::TimerPaused {
            mode: self.mode,
            elapsed_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    pub(crate) fn tick_at(&mut self, now: u64) -> u64 {
        if self.running {
            if let Some(start) = self.session_start_ms {
                self.elapsed_ms = self
                    .committed_ms
                    .saturating_add(now.saturating_sub(start));
            }
        }
        self.elapsed_ms
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
