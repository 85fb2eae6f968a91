//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lithops configuration - resolve backend configuration and talk to the
/// elasticity controller
#[derive(Parser, Debug)]
#[command(name = "lithops-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve the configuration and print it
    ///
    /// Examples:
    ///   lithops-config resolve                       # ~/.lithops/config
    ///   lithops-config resolve -c lithops.yaml -f json
    ///   lithops-config resolve --mode localhost
    Resolve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Storage backend, overriding `lithops.storage`
        #[arg(short, long)]
        storage: Option<String>,

        /// Compute or standalone backend, overriding `lithops.backend`
        #[arg(short, long)]
        backend: Option<String>,

        /// Execution mode, overriding `lithops.mode`
        #[arg(short, long)]
        mode: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// List the built-in backends
    Backends {
        /// Only show one kind: storage, compute or standalone
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Fetch a value published by the elasticity controller
    Get {
        /// Path below the controller endpoint, e.g. `cluster/size`
        path: String,

        #[command(flatten)]
        controller: ControllerArgs,
    },

    /// Report the desired worker count for a role
    Scale {
        /// Role to scale
        #[arg(short, long, default_value = "worker")]
        role: String,

        /// Desired number of workers
        #[arg(short = 'n', long)]
        cardinality: u64,

        #[command(flatten)]
        controller: ControllerArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Configuration file (defaults to ~/.lithops/config)
    #[arg(short, long, env = "LITHOPS_CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ControllerArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Controller context file
    #[arg(long, env = "LITHOPS_CONTROLLER_CONTEXT")]
    pub context_file: Option<PathBuf>,

    /// Controller token file
    #[arg(long, env = "LITHOPS_CONTROLLER_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Maximum attempts per call
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Delay before the first retry, doubling afterwards
    #[arg(long)]
    pub base_delay_ms: Option<u64>,

    /// Per-attempt timeout
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Toml,
    Json,
}

impl From<OutputFormat> for lithops_config::Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => lithops_config::Format::Yaml,
            OutputFormat::Toml => lithops_config::Format::Toml,
            OutputFormat::Json => lithops_config::Format::Json,
        }
    }
}
