use super::ConnectArgs;
use crate::audit;
use crate::store::AppStore;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    #[arg(long, default_value = "100")]
    pub limit: usize,

    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Show full before/after values for a single entry
    #[arg(long)]
    pub id: Option<String>,
}

pub async fn run(args: AuditArgs) -> Result<()> {
    let config = args.connect.load_config()?;
    let backend = args.connect.backend(&config)?;

    let store = AppStore::new();
    store
        .fetch_audit_logs(backend.as_ref(), args.limit, args.offset)
        .await;

    if let Some(error) = store.error() {
        anyhow::bail!("{}", error);
    }
    let result = store.audit_logs().unwrap_or_default();

    if let Some(id) = &args.id {
        let entry = audit::find_entry(&result, id)
            .ok_or_else(|| anyhow::anyhow!("no audit entry with id {}", id))?;

        println!("{}  {}", entry.id, audit::format_action(&entry.action));
        println!("Resource: {} {}", entry.resource_type, entry.resource_id);
        println!("User: {}", entry.user);
        println!("At: {}", entry.created_at);
        if !entry.details.is_empty() {
            println!("Details: {}", entry.details);
        }
        println!();
        println!("--- before ---");
        println!("{}", audit::format_value(&entry.old_value));
        println!("--- after ---");
        println!("{}", audit::format_value(&entry.new_value));
        return Ok(());
    }

    println!("Audit trail ({} of {} entries):", result.entries.len(), result.total);
    println!();
    for entry in &result.entries {
        println!(
            "{}  {:<20} {:<12} {:<28} {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            audit::format_action(&entry.action),
            entry.user,
            entry.resource_id,
            entry.id
        );
    }

    Ok(())
}
