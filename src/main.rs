use anyhow::Result;
use clap::{Parser, Subcommand};
use waf_admin::cli;

#[derive(Parser)]
#[command(name = "waf-admin")]
#[command(version = waf_admin::VERSION)]
#[command(about = "Administrative console for a WAF control plane", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive console (TUI)
    Console(cli::console::ConsoleArgs),

    /// Show protection status for all hosts
    Status(cli::status::StatusArgs),

    /// Manage WAF policies
    Policy(cli::policy::PolicyArgs),

    /// Search traffic logs
    Logs(cli::logs::LogsArgs),

    /// Browse the configuration audit trail
    Audit(cli::audit::AuditArgs),

    /// Configuration management
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (level, format) = logging_settings(&cli.command);
    waf_admin::logging::init_logging(&level, &format)?;

    match cli.command {
        Commands::Console(args) => cli::console::run(args).await,
        Commands::Status(args) => cli::status::run(args).await,
        Commands::Policy(args) => cli::policy::run(args).await,
        Commands::Logs(args) => cli::logs::run(args).await,
        Commands::Audit(args) => cli::audit::run(args).await,
        Commands::Config(args) => cli::config::run(args).await,
    }
}

fn logging_settings(command: &Commands) -> (String, String) {
    let connect = match command {
        Commands::Console(args) => Some(&args.connect),
        Commands::Status(args) => Some(&args.connect),
        Commands::Logs(args) => Some(&args.connect),
        Commands::Audit(args) => Some(&args.connect),
        _ => None,
    };

    connect
        .and_then(|c| c.load_config().ok())
        .map(|config| (config.logging.level, config.logging.format))
        .unwrap_or_else(|| ("info".to_string(), "pretty".to_string()))
}
