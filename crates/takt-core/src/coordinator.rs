//! Mode coordinator.
//!
//! Owns one [`TimerEngine`] per mode, the mode configs, and the shared
//! [`TickSource`]. The tick source is constructed here and handed around
//! explicitly; there is no global tick or audio context to look up.
//!
//! Ticks are a broadcast: every running engine recomputes from its own
//! wall-clock read on each pump. State lives entirely inside each
//! engine, so no cross-engine coordination is needed.

use std::time::Duration;

use chrono::Utc;

use crate::config::Config;
use crate::engine::{now_ms, TimerEngine};
use crate::events::Event;
use crate::modes::{
    CountdownConfig, CountdownView, IntervalConfig, IntervalPhase, IntervalStage, LapList, Mode,
    ZeroLatch,
};
use crate::tick::TickSource;

pub struct ModeCoordinator {
    ticks: TickSource,
    tick_interval_ms: u64,

    countdown: TimerEngine,
    countdown_config: CountdownConfig,
    zero_latch: ZeroLatch,

    stopwatch: TimerEngine,
    laps: LapList,

    interval: TimerEngine,
    interval_config: IntervalConfig,
}

impl ModeCoordinator {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Seed mode defaults and the tick cadence from preferences.
    pub fn from_config(config: &Config) -> Self {
        Self {
            ticks: TickSource::new(),
            tick_interval_ms: config.tick.interval_ms.max(1),
            countdown: TimerEngine::new(Mode::Countdown),
            countdown_config: CountdownConfig::new(config.countdown.default_duration_ms),
            zero_latch: ZeroLatch::default(),
            stopwatch: TimerEngine::new(Mode::Stopwatch),
            laps: LapList::default(),
            interval: TimerEngine::new(Mode::Interval),
            interval_config: IntervalConfig::new(
                config.interval.work_ms,
                config.interval.rest_ms,
                config.interval.rounds,
            ),
        }
    }

    // ── Control ──────────────────────────────────────────────────────

    pub fn start(&mut self, mode: Mode) -> Option<Event> {
        let event = self.engine_mut(mode).start();
        if event.is_some() {
            self.ticks.start(self.tick_interval_ms);
        }
        event
    }

    pub fn pause(&mut self, mode: Mode) -> Option<Event> {
        let event = self.engine_mut(mode).pause();
        self.stop_ticks_if_idle();
        event
    }

    /// Reset one mode to zero. For the stopwatch this clears the lap
    /// list in the same call, so elapsed and laps never disagree; for
    /// the countdown it re-arms the zero latch.
    pub fn reset(&mut self, mode: Mode) -> Option<Event> {
        match mode {
            Mode::Stopwatch => self.laps.clear(),
            Mode::Countdown => self.zero_latch = ZeroLatch::default(),
            Mode::Interval => {}
        }
        let event = self.engine_mut(mode).reset();
        self.stop_ticks_if_idle();
        event
    }

    pub fn set_elapsed(&mut self, mode: Mode, ms: u64) -> Option<Event> {
        self.engine_mut(mode).set_elapsed(ms)
    }

    /// Record a stopwatch lap at the last published elapsed value (at
    /// most one tick interval stale). Whether laps while paused make
    /// sense is the caller's policy; nothing here forbids them.
    pub fn add_lap(&mut self) -> Option<Event> {
        let elapsed_ms = self.stopwatch.elapsed_ms();
        let (index, split_ms) = self.laps.record(elapsed_ms);
        Some(Event::LapRecorded {
            index,
            elapsed_ms,
            split_ms,
            at: Utc::now(),
        })
    }

    // ── Tick pump ────────────────────────────────────────────────────

    /// Block up to `timeout` for the next tick from the source.
    pub fn wait_for_tick(&mut self, timeout: Duration) -> bool {
        self.ticks.recv_timeout(timeout).is_some()
    }

    /// Advance every engine and apply per-mode completion policy.
    /// Called once per tick; also safe to call ad hoc (e.g. before
    /// rendering a status line).
    pub fn on_tick(&mut self) -> Vec<Event> {
        self.on_tick_at(now_ms())
    }

    pub(crate) fn on_tick_at(&mut self, now: u64) -> Vec<Event> {
        let mut events = Vec::new();

        // Countdown: never auto-stops, but the zero crossing fires a
        // one-shot notification.
        let elapsed = self.countdown.tick_at(now);
        let view = CountdownView::derive(elapsed, &self.countdown_config);
        if self
            .zero_latch
            .observe(view.remaining_ms, self.countdown.is_running())
        {
            events.push(Event::CountdownReachedZero {
                duration_ms: self.countdown_config.duration_ms,
                overtime_ms: view.remaining_ms.unsigned_abs(),
                at: Utc::now(),
            });
        }

        self.stopwatch.tick_at(now);

        // Interval: once the final round is done, pause and snap elapsed
        // to the exact boundary so no phantom round is ever displayed.
        // Re-checked every tick while running.
        let elapsed = self.interval.tick_at(now);
        let phase = IntervalPhase::derive(elapsed, &self.interval_config);
        if self.interval.is_running() && phase.round_index >= self.interval_config.rounds() as u64 {
            self.interval.pause_at(now);
            self.interval.set_elapsed(self.interval_config.total_ms());
            self.stop_ticks_if_idle();
            events.push(Event::IntervalCompleted {
                rounds: self.interval_config.rounds(),
                total_ms: self.interval_config.total_ms(),
                at: Utc::now(),
            });
        }

        events
    }

    // ── Configuration ────────────────────────────────────────────────
    // Setters clamp or ignore invalid input instead of erroring.

    pub fn countdown_config(&self) -> &CountdownConfig {
        &self.countdown_config
    }

    pub fn set_countdown_duration_minutes(&mut self, minutes: f64) {
        self.countdown_config.set_duration_minutes(minutes);
    }

    pub fn adjust_countdown_ms(&mut self, delta_ms: i64) {
        self.countdown_config.adjust_ms(delta_ms);
    }

    pub fn interval_config(&self) -> &IntervalConfig {
        &self.interval_config
    }

    /// Replace the interval config wholesale (clamped). Legal while
    /// running; the phase derivation simply shifts on the next tick.
    pub fn set_interval_config(&mut self, work_ms: u64, rest_ms: u64, rounds: u32) {
        self.interval_config = IntervalConfig::new(work_ms, rest_ms, rounds);
    }

    // ── Derived state ────────────────────────────────────────────────

    pub fn elapsed_ms(&self, mode: Mode) -> u64 {
        self.engine(mode).elapsed_ms()
    }

    pub fn is_running(&self, mode: Mode) -> bool {
        self.engine(mode).is_running()
    }

    pub fn countdown_view(&self) -> CountdownView {
        CountdownView::derive(self.countdown.elapsed_ms(), &self.countdown_config)
    }

    pub fn interval_phase(&self) -> IntervalPhase {
        IntervalPhase::derive(self.interval.elapsed_ms(), &self.interval_config)
    }

    pub fn interval_stage(&self) -> IntervalStage {
        IntervalStage::derive(
            self.interval.elapsed_ms(),
            self.interval.is_running(),
            &self.interval_config,
        )
    }

    pub fn laps(&self) -> &[u64] {
        self.laps.laps()
    }

    pub fn splits(&self) -> Vec<u64> {
        self.laps.splits()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn snapshot(&self, mode: Mode) -> Event {
        match mode {
            Mode::Countdown => {
                let view = self.countdown_view();
                Event::CountdownSnapshot {
                    running: self.countdown.is_running(),
                    duration_ms: self.countdown_config.duration_ms,
                    remaining_ms: view.remaining_ms,
                    overtime: view.overtime,
                    display_ms: view.display_ms,
                    at: Utc::now(),
                }
            }
            Mode::Stopwatch => Event::StopwatchSnapshot {
                running: self.stopwatch.is_running(),
                elapsed_ms: self.stopwatch.elapsed_ms(),
                laps: self.laps.laps().to_vec(),
                at: Utc::now(),
            },
            Mode::Interval => {
                let phase = self.interval_phase();
                Event::IntervalSnapshot {
                    running: self.interval.is_running(),
                    stage: self.interval_stage(),
                    is_work: phase.is_work,
                    current_round: phase.current_round,
                    rounds: self.interval_config.rounds(),
                    phase_remaining_ms: phase.phase_remaining_ms,
                    display_ms: phase.display_ms,
                    at: Utc::now(),
                }
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn engine(&self, mode: Mode) -> &TimerEngine {
        match mode {
            Mode::Countdown => &self.countdown,
            Mode::Stopwatch => &self.stopwatch,
            Mode::Interval => &self.interval,
        }
    }

    fn engine_mut(&mut self, mode: Mode) -> &mut TimerEngine {
        match mode {
            Mode::Countdown => &mut self.countdown,
            Mode::Stopwatch => &mut self.stopwatch,
            Mode::Interval => &mut self.interval,
        }
    }

    fn stop_ticks_if_idle(&mut self) {
        let any_running = self.countdown.is_running()
            || self.stopwatch.is_running()
            || self.interval.is_running();
        if !any_running {
            self.ticks.stop();
        }
    }
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;

    fn tabata_coordinator() -> ModeCoordinator {
        let mut c = ModeCoordinator::new();
        c.set_interval_config(20_000, 10_000, 8);
        c
    }

    #[test]
    fn interval_completion_pauses_and_snaps() {
        let mut c = tabata_coordinator();
        c.interval.start_at(T0);

        // Mid-workout tick: still running, no completion.
        let events = c.on_tick_at(T0 + 25_000);
        assert!(events.is_empty());
        assert!(c.is_running(Mode::Interval));

        // Tick lands past the boundary: pause, snap, one event.
        let events = c.on_tick_at(T0 + 241_337);
        assert!(matches!(
            events.as_slice(),
            [Event::IntervalCompleted {
                rounds: 8,
                total_ms: 240_000,
                ..
            }]
        ));
        assert!(!c.is_running(Mode::Interval));
        assert_eq!(c.elapsed_ms(Mode::Interval), 240_000);
        assert_eq!(c.interval_stage(), IntervalStage::Complete);

        // Further ticks while paused never move it past the boundary.
        let events = c.on_tick_at(T0 + 300_000);
        assert!(events.is_empty());
        assert_eq!(c.elapsed_ms(Mode::Interval), 240_000);
    }

    #[test]
    fn interval_not_completed_while_paused() {
        let mut c = tabata_coordinator();
        c.interval.start_at(T0);
        c.interval.pause_at(T0 + 10_000);
        // Paused short of the boundary: a late tick changes nothing.
        let events = c.on_tick_at(T0 + 500_000);
        assert!(events.is_empty());
        assert_eq!(c.elapsed_ms(Mode::Interval), 10_000);
    }

    #[test]
    fn countdown_fires_zero_exactly_once() {
        let mut c = ModeCoordinator::new();
        c.set_countdown_duration_minutes(5.0);
        c.countdown.start_at(T0);

        assert!(c.on_tick_at(T0 + 299_950).is_empty());

        let events = c.on_tick_at(T0 + 300_001);
        assert!(matches!(
            events.as_slice(),
            [Event::CountdownReachedZero {
                duration_ms: 300_000,
                overtime_ms: 1,
                ..
            }]
        ));
        assert!(c.countdown_view().overtime);

        // Overtime keeps elapsing without notification spam.
        assert!(c.on_tick_at(T0 + 310_000).is_empty());
        assert!(c.on_tick_at(T0 + 400_000).is_empty());
        assert!(c.is_running(Mode::Countdown));
    }

    #[test]
    fn countdown_latch_rearms_after_reset() {
        let mut c = ModeCoordinator::new();
        c.set_countdown_duration_minutes(0.001); // 60ms
        c.countdown.start_at(T0);
        assert_eq!(c.on_tick_at(T0 + 100).len(), 1);

        c.reset(Mode::Countdown);
        c.countdown.start_at(T0 + 1_000);
        assert_eq!(c.on_tick_at(T0 + 1_100).len(), 1);
    }

    #[test]
    fn countdown_latch_rearms_when_duration_grows() {
        let mut c = ModeCoordinator::new();
        c.set_countdown_duration_minutes(1.0);
        c.countdown.start_at(T0);
        assert_eq!(c.on_tick_at(T0 + 60_001).len(), 1);

        // Adding time pulls remaining back above zero, re-arming.
        c.adjust_countdown_ms(5 * 60_000);
        assert!(c.on_tick_at(T0 + 60_050).is_empty());
        assert_eq!(c.on_tick_at(T0 + 6 * 60_000 + 1).len(), 1);
    }

    #[test]
    fn stopwatch_reset_clears_laps_with_elapsed() {
        let mut c = ModeCoordinator::new();
        c.stopwatch.start_at(T0);
        c.on_tick_at(T0 + 1_000);
        c.add_lap();
        c.on_tick_at(T0 + 2_500);
        c.add_lap();
        assert_eq!(c.laps().len(), 2);

        c.reset(Mode::Stopwatch);
        assert_eq!(c.elapsed_ms(Mode::Stopwatch), 0);
        assert!(c.laps().is_empty());
        assert!(!c.is_running(Mode::Stopwatch));
    }

    #[test]
    fn lap_splits() {
        let mut c = ModeCoordinator::new();
        c.stopwatch.start_at(T0);
        for at in [1_000, 2_500, 4_200] {
            c.on_tick_at(T0 + at);
            c.add_lap();
        }
        assert_eq!(c.splits(), vec![1_000, 1_500, 1_700]);
    }

    #[test]
    fn engines_are_independent() {
        let mut c = ModeCoordinator::new();
        c.stopwatch.start_at(T0);
        c.countdown.start_at(T0 + 5_000);
        c.on_tick_at(T0 + 10_000);
        assert_eq!(c.elapsed_ms(Mode::Stopwatch), 10_000);
        assert_eq!(c.elapsed_ms(Mode::Countdown), 5_000);
        assert_eq!(c.elapsed_ms(Mode::Interval), 0);

        c.pause(Mode::Stopwatch);
        assert!(c.is_running(Mode::Countdown));
    }

    #[test]
    fn invalid_config_input_is_clamped() {
        let mut c = ModeCoordinator::new();
        let before = c.countdown_config().duration_ms;
        c.set_countdown_duration_minutes(f64::NAN);
        assert_eq!(c.countdown_config().duration_ms, before);

        c.set_interval_config(0, 0, 0);
        assert_eq!(c.interval_config().work_ms(), 1_000);
        assert_eq!(c.interval_config().rounds(), 1);
    }

    #[test]
    fn snapshot_reflects_mode_state() {
        let mut c = tabata_coordinator();
        c.interval.start_at(T0);
        c.on_tick_at(T0 + 25_000);
        match c.snapshot(Mode::Interval) {
            Event::IntervalSnapshot {
                running,
                is_work,
                current_round,
                rounds,
                phase_remaining_ms,
                ..
            } => {
                assert!(running);
                assert!(!is_work);
                assert_eq!(current_round, 1);
                assert_eq!(rounds, 8);
                assert_eq!(phase_remaining_ms, 5_000);
            }
            other => panic!("expected IntervalSnapshot, got {other:?}"),
        }
    }
}
