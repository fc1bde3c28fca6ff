use std::time::Duration;

use clap::Subcommand;
use takt_core::{modes, Mode};

use super::common::{emit, fmt_ms, load_coordinator};

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Run the stopwatch for a fixed stretch
    Run {
        /// How long to run, in seconds
        #[arg(long, default_value_t = 10)]
        for_secs: u64,
        /// Record a lap every N seconds
        #[arg(long)]
        lap_every_secs: Option<u64>,
        /// Emit events as JSON lines on stdout
        #[arg(long)]
        json: bool,
    },
    /// Compute splits for a list of lap snapshots (milliseconds)
    Splits {
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        laps: Vec<u64>,
    },
}

pub fn run(action: StopwatchAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StopwatchAction::Run {
            for_secs,
            lap_every_secs,
            json,
        } => run_live(for_secs, lap_every_secs, json),
        StopwatchAction::Splits { laps } => {
            println!("{}", serde_json::to_string(&modes::splits(&laps))?);
            Ok(())
        }
    }
}

fn run_live(
    for_secs: u64,
    lap_every_secs: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = load_coordinator();
    let stop_at_ms = for_secs.saturating_mul(1_000);
    let lap_every_ms = lap_every_secs.map(|s| s.saturating_mul(1_000).max(1));
    let mut next_lap_ms = lap_every_ms;

    if let Some(event) = coordinator.start(Mode::Stopwatch) {
        emit(&event, json)?;
    }

    loop {
        if !coordinator.wait_for_tick(Duration::from_millis(500)) {
            continue;
        }
        for event in coordinator.on_tick() {
            emit(&event, json)?;
        }

        let elapsed = coordinator.elapsed_ms(Mode::Stopwatch);
        if let (Some(every), Some(due)) = (lap_every_ms, next_lap_ms) {
            if elapsed >= due && elapsed < stop_at_ms {
                if let Some(event) = coordinator.add_lap() {
                    emit(&event, json)?;
                }
                next_lap_ms = Some(due + every);
            }
        }
        if !json {
            eprint!("\r {}   ", fmt_ms(elapsed));
        }
        if elapsed >= stop_at_ms {
            break;
        }
    }
    if !json {
        eprintln!();
    }

    if let Some(event) = coordinator.pause(Mode::Stopwatch) {
        emit(&event, json)?;
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&coordinator.snapshot(Mode::Stopwatch))?
    );
    if !coordinator.laps().is_empty() && !json {
        for (i, (lap, split)) in coordinator
            .laps()
            .iter()
            .zip(coordinator.splits())
            .enumerate()
        {
            eprintln!("lap {:>2}  {}  (+{})", i + 1, fmt_ms(*lap), fmt_ms(split));
        }
    }
    Ok(())
}
