use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use rhythms_core::OutputFormat;

#[derive(Parser)]
#[command(name = "rhythms")]
#[command(about = "Daily standup assembly: merge tracker activity, reconcile in chat, finalize on approval")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one standup cycle interactively
    Standup {
        /// Use built-in sample activity instead of an activity file
        #[arg(long)]
        sample: bool,

        /// JSON file with raw code_host/tracker activity entries
        #[arg(long, conflicts_with = "sample")]
        activity: Option<PathBuf>,

        /// Standup date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Working directory (defaults to CWD)
        #[arg(long)]
        cd: Option<String>,
    },

    /// List recent finalized standups
    History {
        /// Look-back window in days
        #[arg(long, default_value_t = 5)]
        days: u32,

        #[arg(long)]
        cd: Option<String>,
    },

    /// List unresolved blockers across recorded standups
    Blockers {
        #[arg(long)]
        cd: Option<String>,
    },

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show {
        #[arg(long)]
        cd: Option<String>,
    },
    /// Write a commented default .rhythms/config.toml
    Init {
        #[arg(long)]
        cd: Option<String>,
    },
    /// Validate configuration file
    Validate {
        #[arg(long)]
        cd: Option<String>,
    },
}
