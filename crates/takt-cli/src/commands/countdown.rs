use std::time::Duration;

use clap::Subcommand;
use takt_core::{CountdownConfig, CountdownView, Mode};

use super::common::{emit, fmt_ms, load_coordinator};

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Run a countdown live in the terminal
    Run {
        /// Duration in minutes (fractions allowed)
        #[arg(long, default_value_t = 5.0)]
        minutes: f64,
        /// Keep running this far into overtime before exiting
        #[arg(long, default_value_t = 0)]
        overtime_ms: u64,
        /// Emit events as JSON lines on stdout
        #[arg(long)]
        json: bool,
    },
    /// Derive countdown state for a given elapsed value
    Inspect {
        #[arg(long)]
        minutes: f64,
        #[arg(long)]
        elapsed_ms: u64,
    },
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CountdownAction::Run {
            minutes,
            overtime_ms,
            json,
        } => run_live(minutes, overtime_ms, json),
        CountdownAction::Inspect { minutes, elapsed_ms } => {
            let mut cfg = CountdownConfig::default();
            cfg.set_duration_minutes(minutes);
            let view = CountdownView::derive(elapsed_ms, &cfg);
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
    }
}

fn run_live(minutes: f64, overtime_ms: u64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = load_coordinator();
    coordinator.set_countdown_duration_minutes(minutes);

    if let Some(event) = coordinator.start(Mode::Countdown) {
        emit(&event, json)?;
    }

    loop {
        if !coordinator.wait_for_tick(Duration::from_millis(500)) {
            continue;
        }
        for event in coordinator.on_tick() {
            emit(&event, json)?;
        }

        let view = coordinator.countdown_view();
        if !json {
            let sign = if view.overtime { "+" } else { " " };
            eprint!("\r{sign}{}   ", fmt_ms(view.display_ms));
        }
        if view.overtime && view.display_ms >= overtime_ms {
            break;
        }
    }
    if !json {
        eprintln!();
    }

    if let Some(event) = coordinator.pause(Mode::Countdown) {
        emit(&event, json)?;
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&coordinator.snapshot(Mode::Countdown))?
    );
    Ok(())
}
