use super::ConnectArgs;
use crate::model::WafStatus;
use crate::store::AppStore;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub async fn run(args: StatusArgs) -> Result<()> {
    let config = args.connect.load_config()?;
    let backend = args.connect.backend(&config)?;

    let store = AppStore::new();
    store.fetch_status(backend.as_ref()).await;

    if let Some(error) = store.error() {
        anyhow::bail!("{}", error);
    }
    let status = store
        .status()
        .ok_or_else(|| anyhow::anyhow!("backend returned no status"))?;

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "text" => {
            print_text_status(&status);
        }
        _ => {
            anyhow::bail!("Invalid format: {}. Use 'text' or 'json'", args.format);
        }
    }

    Ok(())
}

fn print_text_status(status: &WafStatus) {
    println!("=== WAF Protection Status ===");
    if let Some(last_updated) = status.last_updated {
        println!("Last updated: {}", last_updated);
    }
    println!();

    println!("Global policy:");
    println!("  Mode: {}", status.global_policy.mode);
    println!("  CRS enabled: {}", status.global_policy.enable_crs);
    println!();

    println!("Host policies ({}):", status.host_policies.len());
    let mut hosts: Vec<_> = status.host_policies.keys().collect();
    hosts.sort();
    for host in hosts {
        let policy = &status.host_policies[host];
        println!("  {}:", host);
        println!("    Mode: {}", policy.mode);
        println!("    CRS enabled: {}", policy.enable_crs);
        println!(
            "    Exceptions: {} paths, {} methods, {} IPs",
            policy.exceptions.paths.len(),
            policy.exceptions.methods.len(),
            policy.exceptions.ip_allow.len()
        );
        println!("    Custom rules: {}", policy.custom_rules.len());
        println!("    Version: {}", policy.version);
    }

    println!();
    println!("Controller:");
    println!(
        "  Snippet annotations allowed: {}",
        status.controller_config.allow_snippet_annotations
    );
}
