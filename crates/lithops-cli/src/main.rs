//! Lithops configuration CLI
//!
//! Resolves Lithops configuration files against the built-in backends and
//! reports worker counts to the elasticity controller.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: cannot set up logging: {}", "warning".yellow().bold(), e);
    }

    if let Err(e) = execute_command(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            config,
            storage,
            backend,
            mode,
            format,
        } => commands::run_resolve(
            &config,
            commands::Overrides {
                storage,
                backend,
                mode,
            },
            format,
        ),
        Commands::Backends { kind } => commands::run_backends(kind.as_deref()),
        Commands::Get { path, controller } => commands::run_get(&path, &controller),
        Commands::Scale {
            role,
            cardinality,
            controller,
        } => commands::run_scale(&role, cardinality, &controller),
    }
}
