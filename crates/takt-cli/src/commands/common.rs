use takt_core::{Config, Event, ModeCoordinator};

/// Build a coordinator from the on-disk preferences.
///
/// An unreadable config file is a wiring problem, not a runtime
/// condition to paper over: fail loudly here rather than run with
/// half-initialized state.
pub fn load_coordinator() -> ModeCoordinator {
    match Config::load() {
        Ok(cfg) => ModeCoordinator::from_config(&cfg),
        Err(e) => {
            eprintln!("error: cannot initialize timers: {e}");
            std::process::exit(1);
        }
    }
}

/// Print an event as one JSON line when `--json` is on.
pub fn emit(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

/// `m:ss.t`, growing to `h:mm:ss.t` past an hour.
pub fn fmt_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let tenths = (ms % 1000) / 100;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{tenths}")
    } else {
        format!("{mins}:{secs:02}.{tenths}")
    }
}
