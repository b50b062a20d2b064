//! Entry point for the **cellreorder** scenario runner.
//!
//! ```text
//! cellreorder <scenario.json> [--config <path>]
//! ```
//!
//! Loads the grid metrics, solves the scenario's drag, and prints the
//! outcome as JSON (or `null` when the drop is rejected).  Set `RUST_LOG`
//! to see what the solver tried.

use cellreorder::config::Config;
use cellreorder::scenario::Scenario;
use log::{error, info};
use std::path::{Path, PathBuf};

/// Resolve the config directory (`$XDG_CONFIG_HOME/cellreorder`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("cellreorder")
}

/// Load the config from an explicit path, or try
/// `$XDG_CONFIG_HOME/cellreorder/config.json` and fall back to compiled-in
/// defaults.
fn load_config(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        return match Config::load(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

struct Args {
    scenario: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut scenario = None;
    let mut config = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            _ if scenario.is_none() => scenario = Some(PathBuf::from(&arg)),
            _ => return Err(format!("unexpected argument {:?}", arg)),
        }
    }
    let scenario = scenario.ok_or("usage: cellreorder <scenario.json> [--config <path>]")?;
    Ok(Args { scenario, config })
}

//  Main

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = load_config(args.config.as_deref());

    let scenario = match Scenario::load(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let outcome = match scenario.run(&config.layout) {
        Ok(o) => o,
        Err(e) => {
            error!("scenario error: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("failed to serialize outcome: {}", e);
            std::process::exit(1);
        }
    }
}
