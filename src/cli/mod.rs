pub mod audit;
pub mod config;
pub mod console;
pub mod logs;
pub mod policy;
pub mod status;

pub use audit::AuditArgs;
pub use config::ConfigArgs;
pub use console::ConsoleArgs;
pub use logs::LogsArgs;
pub use policy::PolicyArgs;
pub use status::StatusArgs;

use crate::client::HttpBackend;
use crate::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Connection options shared by every command that talks to the control
/// service.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Path to the console configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding the configuration file
    #[arg(short, long)]
    pub url: Option<String>,
}

impl ConnectArgs {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_ref())?;
        if let Some(url) = &self.url {
            config.backend.url = url.clone();
        }
        Ok(config)
    }

    pub fn backend(&self, config: &Config) -> Result<Arc<HttpBackend>> {
        let backend = HttpBackend::new(
            config.backend.url.clone(),
            Duration::from_secs(config.backend.timeout_secs),
        )?;
        Ok(Arc::new(backend))
    }
}
