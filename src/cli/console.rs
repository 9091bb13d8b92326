use super::ConnectArgs;
use crate::policy::PolicySequencer;
use crate::store::AppStore;
use crate::tui;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Refresh interval in seconds, overriding the configuration file
    #[arg(short, long)]
    pub refresh: Option<u64>,
}

pub async fn run(args: ConsoleArgs) -> Result<()> {
    let mut config = args.connect.load_config()?;
    if let Some(refresh) = args.refresh {
        config.console.refresh_interval_secs = refresh;
    }

    let backend = args.connect.backend(&config)?;
    let store = Arc::new(AppStore::new());
    let sequencer = PolicySequencer::new(backend.clone(), store.clone());

    let app = tui::app::App::new(backend, store, sequencer, &config);
    tui::run_tui(app).await
}
