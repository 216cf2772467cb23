//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "carstate", version, about = "GM car state normalizer")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/carstate.toml")]
    pub config: PathBuf,

    /// Emit JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the signals the configured vehicle subscribes to
    Signals,
    /// Normalize a recorded signal log, one line per cycle
    Replay {
        /// Signal log CSV (headers: frame,message,signal,value)
        #[arg(long, value_name = "FILE")]
        log: PathBuf,
        /// Stop after this many cycles
        #[arg(long, value_name = "N")]
        max_cycles: Option<u64>,
    },
    /// Run the scripted drive through the normalizer
    Simulate {
        /// Number of bus cycles to simulate
        #[arg(long, value_name = "N", default_value_t = carstate_sim::drive::DEFAULT_CYCLES)]
        cycles: u64,
        /// Inject a bus dropout every N source reads (0 disables)
        #[arg(long, value_name = "N", default_value_t = 0)]
        dropout_every: u64,
    },
    /// Build the registry, gear table and normalizer, then exit
    SelfCheck,
}
