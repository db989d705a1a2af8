//! Entry point for the **monhop** command.
//!
//! Connects to the X server, moves the focused window once and exits.  Any
//! failure is logged and terminates the process with a non-zero status; a
//! successful move or a no-op exits silently.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use log::{debug, error, info};
use monhop::command::Direction;
use monhop::config::Config;
use monhop::mover::WindowMover;
use monhop::x11::X11Display;
use std::path::{Path, PathBuf};

/// Move the focused window to the adjacent monitor.
#[derive(Debug, Parser)]
#[command(name = "monhop", version, about)]
struct Cli {
    /// Direction to move (North, South, East, West)
    #[arg(long, default_value = "East")]
    direction: String,

    /// Wrap around to the monitor at the opposite end
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    wrap: bool,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/monhop`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("monhop")
}

/// Load the config given on the command line, or try
/// `$XDG_CONFIG_HOME/monhop/config.json` and fall back to compiled-in
/// defaults.
fn load_config(explicit: Option<&Path>) -> Config {
    if let Some(path) = explicit {
        return match Config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => fatal(e),
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

fn fatal(e: impl std::fmt::Display) -> ! {
    error!("{}", e);
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let direction = Direction::from_flag(&cli.direction);

    let display = X11Display::connect(&config.x11).unwrap_or_else(|e| fatal(e));
    let mover = WindowMover::new(display, config.mover);

    match mover.relocate(direction, cli.wrap) {
        Ok(outcome) => debug!("{:?}", outcome),
        Err(e) => fatal(e),
    }
}
