//! Background tick source.
//!
//! A dedicated thread emits content-free wake-up signals on a fixed
//! cadence so that consumers keep receiving them even when their own
//! thread is busy or deprioritized. Ticks carry no payload on purpose:
//! consumers recompute elapsed time from wall-clock reads, never by
//! counting ticks, so late, early, or dropped ticks cannot corrupt the
//! result.
//!
//! The source is command-driven over a channel: `Start` (re)arms the
//! cadence, replacing any prior one without creating a second emitter;
//! `Stop` is idempotent. If the worker thread cannot be spawned the
//! source degrades to caller-thread pacing at the same nominal cadence.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Default cadence in milliseconds. 50ms keeps displays smooth without
/// noticeable CPU cost.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Command accepted by the tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCommand {
    /// (Re)start periodic emission, replacing any prior cadence.
    Start { interval_ms: u64 },
    /// Halt emission. No-op when already stopped.
    Stop,
}

/// A content-free tick notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Periodic signal generator backed by a dedicated thread.
///
/// Dropping the source disconnects the command channel, which shuts the
/// worker thread down.
pub struct TickSource {
    inner: Inner,
}

enum Inner {
    Worker {
        commands: Sender<TickCommand>,
        ticks: Receiver<Tick>,
    },
    /// Degraded mode: no worker thread available, the receiving thread
    /// paces itself. Precision suffers when that thread stalls, which is
    /// the accepted trade-off.
    Inline(InlinePacer),
}

impl TickSource {
    /// Create a tick source, initially stopped.
    ///
    /// Spawn failure is not propagated: the source falls back to inline
    /// pacing instead.
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (tick_tx, tick_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("takt-tick".into())
            .spawn(move || worker_loop(cmd_rx, tick_tx));
        let inner = match spawned {
            Ok(_) => Inner::Worker {
                commands: cmd_tx,
                ticks: tick_rx,
            },
            Err(_) => Inner::Inline(InlinePacer { interval: None }),
        };
        Self { inner }
    }

    /// Begin emitting ticks every `interval_ms` milliseconds. Replaces
    /// the previous cadence when already running.
    pub fn start(&mut self, interval_ms: u64) {
        self.send(TickCommand::Start { interval_ms });
    }

    /// Halt emission. Idempotent.
    pub fn stop(&mut self) {
        self.send(TickCommand::Stop);
    }

    fn send(&mut self, cmd: TickCommand) {
        let worker_gone = match &mut self.inner {
            Inner::Worker { commands, .. } => commands.send(cmd).is_err(),
            Inner::Inline(pacer) => {
                pacer.apply(cmd);
                false
            }
        };
        if worker_gone {
            // Worker died; degrade rather than go silent.
            let mut pacer = InlinePacer { interval: None };
            pacer.apply(cmd);
            self.inner = Inner::Inline(pacer);
        }
    }

    /// Wait up to `timeout` for the next tick. Returns `None` on
    /// timeout or while stopped.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Tick> {
        match &mut self.inner {
            Inner::Worker { ticks, .. } => ticks.recv_timeout(timeout).ok(),
            Inner::Inline(pacer) => pacer.recv_timeout(timeout),
        }
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

fn worker_loop(commands: Receiver<TickCommand>, ticks: Sender<Tick>) {
    let mut cadence: Option<Duration> = None;
    loop {
        match cadence {
            // Stopped: block until the next command.
            None => match commands.recv() {
                Ok(TickCommand::Start { interval_ms }) => {
                    cadence = Some(Duration::from_millis(interval_ms.max(1)));
                }
                Ok(TickCommand::Stop) => {}
                Err(_) => return,
            },
            // Running: emit a tick per interval unless a command
            // arrives first.
            Some(interval) => match commands.recv_timeout(interval) {
                Ok(TickCommand::Start { interval_ms }) => {
                    cadence = Some(Duration::from_millis(interval_ms.max(1)));
                }
                Ok(TickCommand::Stop) => cadence = None,
                Err(RecvTimeoutError::Timeout) => {
                    if ticks.send(Tick).is_err() {
                        return;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return,
            },
        }
    }
}

struct InlinePacer {
    interval: Option<Duration>,
}

impl InlinePacer {
    fn apply(&mut self, cmd: TickCommand) {
        match cmd {
            TickCommand::Start { interval_ms } => {
                self.interval = Some(Duration::from_millis(interval_ms.max(1)));
            }
            TickCommand::Stop => self.interval = None,
        }
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Option<Tick> {
        match self.interval {
            Some(interval) if interval <= timeout => {
                thread::sleep(interval);
                Some(Tick)
            }
            _ => {
                thread::sleep(timeout);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_after_start() {
        let mut src = TickSource::new();
        src.start(10);
        assert!(src.recv_timeout(Duration::from_millis(500)).is_some());
    }

    #[test]
    fn silent_before_start() {
        let mut src = TickSource::new();
        assert!(src.recv_timeout(Duration::from_millis(30)).is_none());
    }

    #[test]
    fn stop_halts_emission() {
        let mut src = TickSource::new();
        src.start(10);
        assert!(src.recv_timeout(Duration::from_millis(500)).is_some());
        src.stop();
        // Drain ticks already in flight when the stop landed.
        thread::sleep(Duration::from_millis(50));
        while src.recv_timeout(Duration::from_millis(0)).is_some() {}
        assert!(src.recv_timeout(Duration::from_millis(60)).is_none());
    }

    #[test]
    fn restart_replaces_cadence() {
        let mut src = TickSource::new();
        src.start(60_000);
        src.start(10);
        // A 60s cadence would never deliver within the timeout.
        assert!(src.recv_timeout(Duration::from_millis(500)).is_some());
    }

    #[test]
    fn stop_when_stopped_is_a_no_op() {
        let mut src = TickSource::new();
        src.stop();
        src.stop();
        assert!(src.recv_timeout(Duration::from_millis(20)).is_none());
    }

    #[test]
    fn inline_pacer_ticks_at_cadence() {
        let mut pacer = InlinePacer { interval: None };
        pacer.apply(TickCommand::Start { interval_ms: 5 });
        assert!(pacer.recv_timeout(Duration::from_millis(100)).is_some());
        pacer.apply(TickCommand::Stop);
        assert!(pacer.recv_timeout(Duration::from_millis(10)).is_none());
    }
}
