use super::ConnectArgs;
use crate::model::TimeRange;
use crate::query::{self, LogFilter};
use crate::store::AppStore;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct LogsArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Free-text search over the message field
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Filter by HTTP status code
    #[arg(long, default_value = "")]
    pub status: String,

    /// Filter by host
    #[arg(long, default_value = "")]
    pub host: String,

    /// Filter by WAF rule id
    #[arg(long, default_value = "")]
    pub rule_id: String,

    /// Search window in hours, ending now
    #[arg(long)]
    pub hours: Option<i64>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, default_value = "0")]
    pub offset: usize,
}

pub async fn run(args: LogsArgs) -> Result<()> {
    let config = args.connect.load_config()?;
    let backend = args.connect.backend(&config)?;

    let filter = LogFilter {
        free_text: args.query,
        status: args.status,
        host: args.host,
        rule_id: args.rule_id,
    };
    let range = TimeRange::last_hours(args.hours.unwrap_or(config.console.default_time_range_hours));
    let limit = args.limit.unwrap_or(config.console.page_size);
    let log_query = query::to_log_query(&filter, range, limit, args.offset);

    let store = AppStore::new();
    store.search_logs(backend.as_ref(), &log_query).await;

    if let Some(error) = store.error() {
        anyhow::bail!("{}", error);
    }
    let result = store.logs().unwrap_or_default();

    println!(
        "Query: {}  ({} entries, {} total)",
        log_query.query,
        result.entries.len(),
        result.total
    );
    println!();

    for entry in &result.entries {
        let rule = entry
            .rule_id
            .as_deref()
            .map(|id| format!(" rule={}", id))
            .unwrap_or_default();
        println!(
            "{} {:4} {:6} {:<24} {}{}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.status,
            entry.method,
            entry.host,
            entry.path,
            rule,
            entry.client_ip
        );
    }

    Ok(())
}
