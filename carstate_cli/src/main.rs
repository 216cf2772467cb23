mod cli;
mod commands;
mod error_fmt;
mod logging;

use clap::Parser;
use eyre::Result;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }

    if let Err(e) = run(cli) {
        tracing::error!(error = %format!("{e:#}"), "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        }
        eprintln!("{}", humanize(&e));
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = commands::load_config(&cli.config)?;
    logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), variant = %cfg.vehicle.variant, "config loaded");

    match cli.cmd {
        Commands::Signals => commands::print_signals(&cfg, cli.json),
        Commands::SelfCheck => commands::self_check(&cfg, cli.json),
        Commands::Replay { log, max_cycles } => {
            let shutdown = commands::install_shutdown_handler();
            commands::replay(&cfg, &log, max_cycles, cli.json, shutdown).map(|_| ())
        }
        Commands::Simulate {
            cycles,
            dropout_every,
        } => {
            let shutdown = commands::install_shutdown_handler();
            commands::simulate(&cfg, cycles, dropout_every, cli.json, shutdown).map(|_| ())
        }
    }
}
