//! Hub configuration: optional YAML file, then environment overrides.
//!
//! The environment is read exactly once, through a lookup function passed
//! to [`HubConfig::load`], so tests never touch the process environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use authn_dispatcher::config::AuthNDispatcherConfig;
use ldap_authn_plugin::LdapAuthNPluginConfig;
use secrecy::SecretString;
use serde::Deserialize;
use session_provisioner::SessionProvisionerConfig;

pub const LDAP_SEARCH_USER: &str = "LDAP_SEARCH_USER";
pub const LDAP_SEARCH_PASSWORD: &str = "LDAP_SEARCH_PASSWORD";

/// Values of `JUPYTERHUB_ENABLE_LAB` that switch the lab interface on.
const TRUTHY: [&str; 4] = ["true", "yes", "y", "1"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Whole-process configuration, one section per component.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    pub dispatcher: AuthNDispatcherConfig,

    /// Directory backends. Each is registered under all of its domains.
    pub backends: Vec<LdapAuthNPluginConfig>,

    pub provisioner: SessionProvisionerConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            dispatcher: AuthNDispatcherConfig::default(),
            backends: vec![tmw_backend()],
            provisioner: SessionProvisionerConfig::default(),
        }
    }
}

/// The corporate directory every deployment starts with.
#[must_use]
pub fn tmw_backend() -> LdapAuthNPluginConfig {
    LdapAuthNPluginConfig {
        domains: vec!["tmw".to_owned()],
        server_address: "tmw.com".to_owned(),
        bind_dn_templates: vec![r"tmw\{username}".to_owned()],
        user_search_base: "DC=tmw".to_owned(),
        ..LdapAuthNPluginConfig::default()
    }
}

impl HubConfig {
    /// Load the configuration.
    ///
    /// Starts from the defaults, or from `file` when given, then applies the
    /// environment as seen through `lookup`. Empty variables count as unset.
    ///
    /// # Errors
    ///
    /// - `Io` / `Parse` if the file cannot be read or is not valid YAML
    /// - `Missing` if `LDAP_SEARCH_USER` or `LDAP_SEARCH_PASSWORD` is unset
    /// - `Invalid` if a numeric variable does not parse
    pub fn load<F>(file: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides(|name| lookup(name).filter(|v| !v.is_empty()))?;
        Ok(cfg)
    }

    /// Parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Parse` when the file is unreadable or malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_saphyr::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let search_user = env(LDAP_SEARCH_USER).ok_or(ConfigError::Missing(LDAP_SEARCH_USER))?;
        let search_password =
            env(LDAP_SEARCH_PASSWORD).ok_or(ConfigError::Missing(LDAP_SEARCH_PASSWORD))?;
        let search_password = SecretString::from(search_password);
        for backend in &mut self.backends {
            if backend.lookup_dn_search_user.is_none() {
                backend.lookup_dn_search_user = Some(search_user.clone());
                backend.lookup_dn_search_password = Some(search_password.clone());
            }
        }

        if let Some(path) = env("ADMIN_USERS_FILE") {
            self.dispatcher.admin_users_file = PathBuf::from(path);
        }
        if let Some(path) = env("USER_WHITELIST_FILE") {
            self.dispatcher.allowed_users_file = PathBuf::from(path);
        }

        let p = &mut self.provisioner;
        if let Some(value) = env("JUPYTERHUB_ENABLE_LAB") {
            p.enable_lab = TRUTHY.contains(&value.to_lowercase().as_str());
        }
        if let Some(token) = env("REST_API_PASSWORD") {
            p.rest_api_password = Some(SecretString::from(token));
        }
        if let Some(version) = env("VOLUME_VERSION_NUMBER") {
            p.volume_version = version;
        }
        if let Some(name) = env("JUPYTERHUB_SERVICE_NAME") {
            p.service_name = name;
        }
        // Without an explicit address the service name is used.
        if let Some(address) = env("HUB_CONNECT_IP") {
            p.connect_address = Some(address);
        }

        if let Some(cpu) = parse_var(&env, "NOTEBOOK_CPU_REQUEST")? {
            p.resources.cpu_guarantee = Some(cpu);
        }
        if let Some(cpu) = parse_var(&env, "NOTEBOOK_CPU_LIMIT")? {
            p.resources.cpu_limit = Some(cpu);
        }
        if let Some(mem) = env("NOTEBOOK_MEMORY_REQUEST") {
            p.resources.mem_guarantee = Some(mem);
        }
        if let Some(mem) = env("NOTEBOOK_MEMORY_LIMIT") {
            p.resources.mem_limit = Some(mem);
        }
        if let Some(timeout) = parse_var(&env, "JUPYTERHUB_IDLE_TIMEOUT")? {
            p.idle_timeout_secs = Some(timeout);
        }

        Ok(())
    }
}

fn parse_var<T, F>(env: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    env(name)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
