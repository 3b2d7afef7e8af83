use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ztp",
    about = "Control and inspect the zero touch provisioning service",
    version
)]
pub struct Cli {
    /// Use this configuration file instead of the system default.
    #[arg(short = 'C', long = "config-json", value_name = "FILE", global = true)]
    pub config_json: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enable provisioning.
    Enable,

    /// Disable provisioning, stopping any active session.
    Disable {
        /// Do not ask for confirmation.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Stop any active session and erase all session data.
    Erase {
        /// Do not ask for confirmation.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Restart provisioning from scratch.
    Run {
        /// Do not ask for confirmation.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// List supported provisioning features.
    Features {
        /// Include each feature's description and value.
        #[arg(short = 'v', long)]
        verbose: bool,
    },

    /// Show provisioning status.
    Status {
        /// Detailed report including every section.
        #[arg(short = 'v', long)]
        verbose: bool,

        /// Single status code line for scripts.
        #[arg(short = 'c', long)]
        code: bool,
    },
}

impl Command {
    /// Subcommand name as typed, used in error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Enable => "enable",
            Command::Disable { .. } => "disable",
            Command::Erase { .. } => "erase",
            Command::Run { .. } => "run",
            Command::Features { .. } => "features",
            Command::Status { .. } => "status",
        }
    }
}
