use std::time::Duration;

use clap::Subcommand;
use takt_core::{Event, IntervalConfig, IntervalPhase, Mode};

use super::common::{emit, fmt_ms, load_coordinator};

#[derive(Subcommand)]
pub enum IntervalAction {
    /// Run a work/rest workout to completion
    Run {
        #[arg(long, default_value_t = 20)]
        work_secs: u64,
        #[arg(long, default_value_t = 10)]
        rest_secs: u64,
        #[arg(long, default_value_t = 8)]
        rounds: u32,
        /// Emit events as JSON lines on stdout
        #[arg(long)]
        json: bool,
    },
    /// Derive the phase for a given elapsed value
    Inspect {
        #[arg(long, default_value_t = 20)]
        work_secs: u64,
        #[arg(long, default_value_t = 10)]
        rest_secs: u64,
        #[arg(long, default_value_t = 8)]
        rounds: u32,
        #[arg(long)]
        elapsed_ms: u64,
    },
}

pub fn run(action: IntervalAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        IntervalAction::Run {
            work_secs,
            rest_secs,
            rounds,
            json,
        } => run_live(work_secs, rest_secs, rounds, json),
        IntervalAction::Inspect {
            work_secs,
            rest_secs,
            rounds,
            elapsed_ms,
        } => {
            let cfg = IntervalConfig::new(
                work_secs.saturating_mul(1_000),
                rest_secs.saturating_mul(1_000),
                rounds,
            );
            let phase = IntervalPhase::derive(elapsed_ms, &cfg);
            println!("{}", serde_json::to_string_pretty(&phase)?);
            Ok(())
        }
    }
}

fn run_live(
    work_secs: u64,
    rest_secs: u64,
    rounds: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = load_coordinator();
    coordinator.set_interval_config(
        work_secs.saturating_mul(1_000),
        rest_secs.saturating_mul(1_000),
        rounds,
    );

    if let Some(event) = coordinator.start(Mode::Interval) {
        emit(&event, json)?;
    }

    // Banner is reprinted only when the phase flips or the round
    // advances.
    let mut banner: Option<(bool, u32)> = None;
    loop {
        if !coordinator.wait_for_tick(Duration::from_millis(500)) {
            continue;
        }
        let events = coordinator.on_tick();
        let mut done = false;
        for event in &events {
            emit(event, json)?;
            if matches!(event, Event::IntervalCompleted { .. }) {
                done = true;
            }
        }
        if done {
            break;
        }

        let phase = coordinator.interval_phase();
        if !json {
            let key = (phase.is_work, phase.current_round);
            if banner != Some(key) {
                banner = Some(key);
                eprintln!(
                    "\nround {}/{}  {}",
                    phase.current_round,
                    rounds,
                    if phase.is_work { "WORK" } else { "REST" }
                );
            }
            eprint!("\r {}   ", fmt_ms(phase.display_ms));
        }
    }

    if !json {
        eprintln!("\nworkout complete");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&coordinator.snapshot(Mode::Interval))?
    );
    Ok(())
}
