//! Directory `AuthN` backend plugin module.

use std::sync::Arc;

use authn_dispatcher_sdk::AuthNBackendPluginClient;
use regex::Regex;
use tracing::{info, warn};

use crate::config::{LdapAuthNPluginConfig, LookupMode};
use crate::domain::directory::{DirectoryConnector, ServerProfile};
use crate::domain::service::{SearchAccount, Service};

/// Errors detected while validating the plugin configuration at start-up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("directory backend needs at least one domain")]
    NoDomains,

    #[error("directory server address is empty")]
    MissingServer,

    #[error("at least one bind DN template is required")]
    NoBindTemplates,

    #[error("bind DN template '{0}' has no {{username}} placeholder")]
    TemplateWithoutUsername(String),

    #[error("search-then-bind lookup requires a search account and password")]
    MissingSearchAccount,

    #[error("invalid username pattern: {0}")]
    InvalidUsernamePattern(#[from] regex::Error),
}

/// Directory `AuthN` backend plugin.
///
/// Owns one configured backend and the domain keys it serves; the host
/// registers [`LdapAuthNPlugin::client`] in the dispatcher's registry under
/// each of [`LdapAuthNPlugin::domains`].
pub struct LdapAuthNPlugin {
    domains: Vec<String>,
    service: Arc<Service>,
}

impl LdapAuthNPlugin {
    /// Validate the configuration and build the backend.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid setting.
    pub fn init(
        cfg: &LdapAuthNPluginConfig,
        connector: Arc<dyn DirectoryConnector>,
    ) -> Result<Self, ConfigError> {
        if cfg.domains.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::NoDomains);
        }
        if cfg.server_address.trim().is_empty() {
            return Err(ConfigError::MissingServer);
        }
        if cfg.bind_dn_templates.is_empty() {
            return Err(ConfigError::NoBindTemplates);
        }
        if let Some(template) = cfg
            .bind_dn_templates
            .iter()
            .find(|t| !t.contains("{username}"))
        {
            return Err(ConfigError::TemplateWithoutUsername(template.clone()));
        }

        let search_account = match (
            &cfg.lookup_dn_search_user,
            &cfg.lookup_dn_search_password,
        ) {
            (Some(dn), Some(password)) if !dn.trim().is_empty() => Some(SearchAccount {
                dn: dn.clone(),
                password: password.clone(),
            }),
            _ if cfg.lookup_mode == LookupMode::SearchThenBind => {
                return Err(ConfigError::MissingSearchAccount);
            }
            _ => None,
        };

        let valid_username = Regex::new(&cfg.valid_username_regex)?;

        if !cfg.use_ssl {
            warn!(
                server = %cfg.server_address,
                "Directory connection does not use SSL; passwords travel in clear text"
            );
        }

        let server = ServerProfile {
            address: cfg.server_address.clone(),
            port: cfg.port(),
            use_ssl: cfg.use_ssl,
        };

        info!(
            server = %server.address,
            port = server.port,
            domains = ?cfg.domains,
            mode = ?cfg.lookup_mode,
            templates = cfg.bind_dn_templates.len(),
            "Loaded directory backend configuration"
        );

        let service = Service {
            server,
            mode: cfg.lookup_mode,
            bind_dn_templates: cfg.bind_dn_templates.clone(),
            user_search_base: cfg.user_search_base.clone(),
            search_filter: cfg.lookup_dn_search_filter.clone(),
            search_account,
            user_attribute: cfg.user_attribute.clone(),
            user_dn_attribute: cfg.lookup_dn_user_dn_attribute.clone(),
            valid_username,
            connector,
        };

        Ok(Self {
            domains: cfg
                .domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            service: Arc::new(service),
        })
    }

    /// Normalized domain keys served by this backend.
    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }

    /// Backend client to register with the dispatcher.
    #[must_use]
    pub fn client(&self) -> Arc<dyn AuthNBackendPluginClient> {
        self.service.clone()
    }
}
