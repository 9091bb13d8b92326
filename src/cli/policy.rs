use super::ConnectArgs;
use crate::model::{ApplyStrategy, CustomRule, PolicyDraft, WafExceptions, WafMode};
use crate::policy::{PolicySequencer, SaveOutcome};
use crate::store::AppStore;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::sync::Arc;

#[derive(Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Subcommand)]
pub enum PolicyCommand {
    /// List all policies known to the control service
    List {
        #[command(flatten)]
        connect: ConnectArgs,
    },

    /// Create a new host policy (mode, then exceptions, then rules)
    Create {
        #[command(flatten)]
        connect: ConnectArgs,

        #[arg(long)]
        host: String,

        #[arg(long, default_value = "On")]
        mode: WafMode,

        /// Whether the baseline managed rule set is active
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        enable_crs: bool,

        /// Path exception, repeatable
        #[arg(long = "path")]
        paths: Vec<String>,

        /// Method exception, repeatable
        #[arg(long = "method")]
        methods: Vec<String>,

        /// IP/CIDR allowlist entry, repeatable
        #[arg(long = "ip")]
        ips: Vec<String>,
    },

    /// Change the mode of an existing policy
    SetMode {
        #[command(flatten)]
        connect: ConnectArgs,

        #[arg(long)]
        host: String,

        #[arg(long)]
        mode: WafMode,

        #[arg(long)]
        enable_crs: Option<bool>,
    },

    /// Replace a policy's exceptions
    SetExceptions {
        #[command(flatten)]
        connect: ConnectArgs,

        #[arg(long)]
        host: String,

        #[arg(long = "path")]
        paths: Vec<String>,

        #[arg(long = "method")]
        methods: Vec<String>,

        #[arg(long = "ip")]
        ips: Vec<String>,
    },

    /// Replace a policy's custom rules from a JSON file
    SetRules {
        #[command(flatten)]
        connect: ConnectArgs,

        #[arg(long)]
        host: String,

        /// JSON file holding an array of custom rules
        rules_file: std::path::PathBuf,
    },

    /// Materialize the stored policy into enforcement configuration
    Apply {
        #[command(flatten)]
        connect: ConnectArgs,

        #[arg(long)]
        host: String,

        #[arg(long, default_value = "annotation")]
        strategy: String,
    },
}

fn build_sequencer(connect: &ConnectArgs) -> Result<(PolicySequencer, Arc<AppStore>)> {
    let config = connect.load_config()?;
    let backend = connect.backend(&config)?;
    let store = Arc::new(AppStore::new());
    Ok((PolicySequencer::new(backend, store.clone()), store))
}

pub async fn run(args: PolicyArgs) -> Result<()> {
    match args.command {
        PolicyCommand::List { connect } => {
            let config = connect.load_config()?;
            let backend = connect.backend(&config)?;
            let store = AppStore::new();
            store.fetch_status(backend.as_ref()).await;

            if let Some(error) = store.error() {
                anyhow::bail!("{}", error);
            }
            let status = store.status().unwrap_or_default();

            let mut hosts: Vec<_> = status.host_policies.keys().collect();
            hosts.sort();
            println!("{:<32} {:<14} {:<6} {:<6} {:<6}", "HOST", "MODE", "CRS", "RULES", "VER");
            for host in hosts {
                let policy = &status.host_policies[host];
                println!(
                    "{:<32} {:<14} {:<6} {:<6} {:<6}",
                    host,
                    policy.mode.to_string(),
                    policy.enable_crs,
                    policy.custom_rules.len(),
                    policy.version
                );
            }
            Ok(())
        }

        PolicyCommand::Create {
            connect,
            host,
            mode,
            enable_crs,
            paths,
            methods,
            ips,
        } => {
            let (sequencer, _) = build_sequencer(&connect)?;

            let mut draft = PolicyDraft::new(host);
            draft.mode = mode;
            draft.enable_crs = enable_crs;
            for path in paths {
                draft.add_path(path);
            }
            for method in methods {
                draft.add_method(method);
            }
            for ip in ips {
                draft.add_ip(ip);
            }

            match sequencer.create(&draft).await? {
                SaveOutcome::Created => {
                    println!("[OK] Policy created");
                }
                SaveOutcome::CreatedModeOnly(failure) => {
                    println!("[!] Policy created with mode only: {}", failure);
                    println!("    Retry the {} step once the backend recovers.", failure.step);
                }
                SaveOutcome::CreatedModeAndExceptions(failure) => {
                    println!("[!] Policy created without custom rules: {}", failure);
                    println!("    Retry the {} step once the backend recovers.", failure.step);
                }
                SaveOutcome::Failed(failure) => {
                    anyhow::bail!("Policy creation failed: {}", failure);
                }
            }
            Ok(())
        }

        PolicyCommand::SetMode {
            connect,
            host,
            mode,
            enable_crs,
        } => {
            let (sequencer, _) = build_sequencer(&connect)?;

            let mut draft = PolicyDraft::new(host.clone());
            draft.mode = mode;
            draft.enable_crs = enable_crs.unwrap_or(true);
            draft.existing = true;

            sequencer.update(&draft).await?;
            println!("[OK] Mode for {} set to {}", host, mode);
            Ok(())
        }

        PolicyCommand::SetExceptions {
            connect,
            host,
            paths,
            methods,
            ips,
        } => {
            let (sequencer, _) = build_sequencer(&connect)?;

            let exceptions = WafExceptions {
                paths,
                methods,
                ip_allow: ips,
                ..Default::default()
            };
            sequencer.set_exceptions(&host, &exceptions).await?;
            println!("[OK] Exceptions for {} updated", host);
            Ok(())
        }

        PolicyCommand::SetRules {
            connect,
            host,
            rules_file,
        } => {
            let (sequencer, _) = build_sequencer(&connect)?;

            let content = std::fs::read_to_string(&rules_file)?;
            let rules: Vec<CustomRule> = serde_json::from_str(&content)?;

            sequencer.set_rules(&host, &rules).await?;
            println!("[OK] {} custom rules for {} updated", rules.len(), host);
            Ok(())
        }

        PolicyCommand::Apply {
            connect,
            host,
            strategy,
        } => {
            let (sequencer, _) = build_sequencer(&connect)?;

            let strategy = match strategy.as_str() {
                "annotation" => ApplyStrategy::Annotation,
                "configmap" => ApplyStrategy::Configmap,
                other => anyhow::bail!(
                    "Invalid strategy: {}. Use 'annotation' or 'configmap'",
                    other
                ),
            };

            sequencer.apply(&host, strategy).await?;
            println!("[OK] Configuration applied for {}", host);
            Ok(())
        }
    }
}
