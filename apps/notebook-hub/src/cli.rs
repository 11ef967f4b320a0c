//! Command-line interface.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hub_security::UserContext;
use ldap_authn_plugin::DirectoryConnector;
use session_provisioner::{LocalUserStorage, SessionDescriptor};

use crate::bootstrap::{OfflineConnector, build_dispatcher, build_provisioner};
use crate::config::HubConfig;
use crate::logging::LogFormat;

/// Multi-domain notebook hub: authentication routing and session provisioning.
#[derive(Parser, Debug)]
#[command(name = "notebook-hub")]
#[command(version)]
pub struct Cli {
    /// YAML configuration file; environment variables override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration and wire every backend without connecting.
    CheckConfig,
    /// Print the provisioning policy handed to the orchestrator as JSON.
    Policy,
    /// Materialize a session descriptor for a user.
    Admit(AdmitArgs),
}

#[derive(clap::Args, Debug)]
pub struct AdmitArgs {
    /// Authenticated user name.
    #[arg(long)]
    pub user: String,

    /// Numeric user id.
    #[arg(long, default_value_t = 0)]
    pub id: u64,

    #[arg(long)]
    pub admin: bool,

    /// Descriptor JSON file; read from stdin when omitted.
    #[arg(long)]
    pub descriptor: Option<PathBuf>,
}

/// Run one command with an already loaded configuration.
///
/// # Errors
///
/// Returns the first wiring, I/O or provisioning failure.
pub fn run(
    cfg: &HubConfig,
    command: &Commands,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Commands::CheckConfig => {
            let connector: Arc<dyn DirectoryConnector> = Arc::new(OfflineConnector);
            let dispatcher = build_dispatcher(cfg, &connector)?;
            let provisioner = build_provisioner(cfg, Arc::new(LocalUserStorage));
            writeln!(
                output,
                "configuration ok: domains [{}], storage claim {}",
                dispatcher.registry().domains().join(", "),
                provisioner.policy().claim_name
            )?;
        }
        Commands::Policy => {
            let provisioner = build_provisioner(cfg, Arc::new(LocalUserStorage));
            serde_json::to_writer_pretty(&mut *output, provisioner.policy())?;
            writeln!(output)?;
        }
        Commands::Admit(args) => {
            let descriptor = read_descriptor(args.descriptor.as_deref(), input)?;
            let user = UserContext::builder()
                .name(args.user.as_str())
                .id(args.id)
                .admin(args.admin)
                .build();
            let provisioner = build_provisioner(cfg, Arc::new(LocalUserStorage));
            let admitted = provisioner.admit(&user, descriptor)?;
            serde_json::to_writer_pretty(&mut *output, &admitted)?;
            writeln!(output)?;
        }
    }
    Ok(())
}

fn read_descriptor(
    path: Option<&Path>,
    input: &mut dyn Read,
) -> anyhow::Result<SessionDescriptor> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read descriptor {}", path.display()))?,
        None => {
            let mut raw = String::new();
            input
                .read_to_string(&mut raw)
                .context("cannot read descriptor from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("descriptor is not valid JSON")
}
