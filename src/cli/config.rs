use crate::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a configuration file populated with defaults
    Init {
        #[arg(short, long, default_value = "waf-admin.toml")]
        output: PathBuf,
    },
}

pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Check { config } => {
            println!("Checking configuration: {}", config.display());

            let cfg = Config::from_file(&config)?;
            let warnings = cfg.validate()?;

            if warnings.is_empty() {
                println!(" Configuration is valid!");
            } else {
                println!("Configuration loaded with warnings:\n");
                for warning in warnings {
                    println!("{}", warning);
                }
            }

            Ok(())
        }

        ConfigCommand::Init { output } => {
            let config = Config::default();
            crate::config::parser::save_config(&config, &output)?;

            println!("[OK] Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}
