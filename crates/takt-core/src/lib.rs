//! # Takt Core Library
//!
//! Core timing logic for Takt, a multi-mode timer (countdown, stopwatch,
//! interval). The CLI binary is a thin layer over this library; any other
//! front end consumes the same surface.
//!
//! ## Architecture
//!
//! - **Tick Source**: a dedicated thread that emits content-free wake-up
//!   signals on a fixed cadence, decoupled from whatever the caller's
//!   thread is doing
//! - **Timer Engine**: wall-clock-delta elapsed-time bookkeeping for one
//!   timer instance; ticks only trigger recomputation, they are never
//!   counted
//! - **Mode derivations**: pure functions from `(elapsed, config)` to
//!   countdown/stopwatch/interval display state
//! - **Mode Coordinator**: owns one engine per mode plus the shared tick
//!   source, and enforces per-mode completion policy
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: elapsed-time state machine
//! - [`TickSource`]: background tick emitter
//! - [`ModeCoordinator`]: three engines plus derivation and policy
//! - [`Config`]: TOML preference storage

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod events;
pub mod modes;
pub mod tick;

pub use config::Config;
pub use coordinator::ModeCoordinator;
pub use engine::TimerEngine;
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use modes::{
    CountdownConfig, CountdownView, IntervalConfig, IntervalPhase, IntervalStage, Mode,
};
pub use tick::{TickCommand, TickSource, DEFAULT_TICK_INTERVAL_MS};
