use anyhow::Result;
use clap::Parser;

mod cli;
mod config_cmds;
mod console;
mod history_cmd;
mod project;
mod standup_cmd;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let output_format = cli.format.clone();

    match cli.command {
        Commands::Standup {
            sample,
            activity,
            date,
            cd,
        } => {
            let exit_code =
                standup_cmd::handle_standup(sample, activity, date, cd, output_format).await?;
            std::process::exit(exit_code);
        }
        Commands::History { days, cd } => {
            history_cmd::handle_history(days, cd, output_format)?;
        }
        Commands::Blockers { cd } => {
            history_cmd::handle_blockers(cd, output_format)?;
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show { cd } => {
                config_cmds::handle_config_show(cd, output_format)?;
            }
            ConfigCommands::Init { cd } => {
                config_cmds::handle_config_init(cd)?;
            }
            ConfigCommands::Validate { cd } => {
                config_cmds::handle_config_validate(cd)?;
            }
        },
    }

    Ok(())
}
