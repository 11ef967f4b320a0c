//! Wiring of the hub components from a loaded [`HubConfig`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use authn_dispatcher::{AuthNDispatcher, BackendRegistry};
use ldap_authn_plugin::{
    DirectoryConnector, DirectoryError, DirectorySession, LdapAuthNPlugin, ServerProfile,
};
use session_provisioner::{SessionProvisioner, UserStorage};
use tracing::info;

use crate::config::HubConfig;

/// Build every configured directory backend and the dispatcher over them.
///
/// # Errors
///
/// Fails if a backend configuration is invalid, two backends claim the same
/// domain, or the user lists cannot be read.
pub fn build_dispatcher(
    cfg: &HubConfig,
    connector: &Arc<dyn DirectoryConnector>,
) -> anyhow::Result<AuthNDispatcher> {
    let mut registry = BackendRegistry::builder();
    for (index, backend_cfg) in cfg.backends.iter().enumerate() {
        let plugin = LdapAuthNPlugin::init(backend_cfg, connector.clone())
            .with_context(|| format!("invalid directory backend #{index}"))?;
        let client = plugin.client();
        for domain in plugin.domains() {
            registry = registry
                .register(domain, client.clone())
                .context("cannot register directory backend")?;
        }
    }

    let dispatcher = AuthNDispatcher::init(&cfg.dispatcher, registry.build())
        .context("cannot load user lists")?;
    info!(
        domains = ?dispatcher.registry().domains(),
        "Authentication dispatcher ready"
    );
    Ok(dispatcher)
}

#[must_use]
pub fn build_provisioner(cfg: &HubConfig, storage: Arc<dyn UserStorage>) -> SessionProvisioner {
    SessionProvisioner::init(&cfg.provisioner, storage)
}

/// Connector for commands that validate configuration without logging
/// anyone in. Every connection attempt fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineConnector;

#[async_trait]
impl DirectoryConnector for OfflineConnector {
    async fn connect(
        &self,
        server: &ServerProfile,
    ) -> Result<Box<dyn DirectorySession>, DirectoryError> {
        Err(DirectoryError::Unavailable(format!(
            "no directory client linked, cannot reach {}:{}",
            server.address, server.port
        )))
    }
}
