//! Config command - inspect the resolved client configuration.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{Context, print_header, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the settings that would be used, as TOML
    Show,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut config = ctx.config.clone();
            if !config.api_key.is_empty() {
                config.api_key = "********".to_string();
            }
            if ctx.json_output {
                print_json(&config)?;
            } else {
                print_header("Client Configuration");
                print!("{}", config.to_toml_string()?);
            }
        }
    }

    Ok(())
}
