//! Configuration for the directory `AuthN` backend plugin.

use secrecy::SecretString;
use serde::Deserialize;

/// Accepts user names of at least seven characters made of ASCII letters,
/// digits, backslash, dot, underscore and hyphen.
pub const DEFAULT_VALID_USERNAME_REGEX: &str = r"^[A-Za-z0-9\\._-]{7,}$";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LdapAuthNPluginConfig {
    /// Domain keys this backend is registered under.
    pub domains: Vec<String>,

    /// Host name of the directory server.
    pub server_address: String,

    /// Port override. Defaults to 636 with SSL and 389 without.
    pub server_port: Option<u16>,

    /// Require an SSL connection to the directory.
    pub use_ssl: bool,

    /// Bind DN templates tried in order; `{username}` is replaced by the
    /// resolved user name.
    pub bind_dn_templates: Vec<String>,

    /// Base DN of the user search.
    pub user_search_base: String,

    pub lookup_mode: LookupMode,

    /// Search filter; `{login_attr}` and `{login}` are replaced.
    pub lookup_dn_search_filter: String,

    /// Service account used for the search. Required in `search_then_bind` mode.
    pub lookup_dn_search_user: Option<String>,

    pub lookup_dn_search_password: Option<SecretString>,

    /// Attribute matched against the login name.
    pub user_attribute: String,

    /// Attribute whose value is substituted into the bind templates.
    pub lookup_dn_user_dn_attribute: String,

    /// Logins whose user name does not match are rejected without
    /// contacting the directory.
    pub valid_username_regex: String,
}

impl Default for LdapAuthNPluginConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            server_address: String::new(),
            server_port: None,
            use_ssl: true,
            bind_dn_templates: Vec::new(),
            user_search_base: String::new(),
            lookup_mode: LookupMode::SearchThenBind,
            lookup_dn_search_filter: "({login_attr}={login})".to_owned(),
            lookup_dn_search_user: None,
            lookup_dn_search_password: None,
            user_attribute: "sAMAccountName".to_owned(),
            lookup_dn_user_dn_attribute: "sAMAccountName".to_owned(),
            valid_username_regex: DEFAULT_VALID_USERNAME_REGEX.to_owned(),
        }
    }
}

impl LdapAuthNPluginConfig {
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server_port
            .unwrap_or(if self.use_ssl { 636 } else { 389 })
    }
}

/// How the bind DN of a user is determined.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// Render the bind templates with the login name directly.
    DirectBind,
    /// Search the user first and bind with the looked-up attribute value.
    #[default]
    SearchThenBind,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_port_follows_ssl_flag() {
        let mut cfg = LdapAuthNPluginConfig::default();
        assert_eq!(cfg.port(), 636);

        cfg.use_ssl = false;
        assert_eq!(cfg.port(), 389);

        cfg.server_port = Some(3269);
        assert_eq!(cfg.port(), 3269);
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: LdapAuthNPluginConfig = serde_json::from_str(
            r#"{
                "domains": ["tmw"],
                "server_address": "tmw.com",
                "bind_dn_templates": ["tmw\\{username}"],
                "user_search_base": "DC=tmw"
            }"#,
        )
        .unwrap();

        assert!(cfg.use_ssl);
        assert_eq!(cfg.lookup_mode, LookupMode::SearchThenBind);
        assert_eq!(cfg.bind_dn_templates, vec![r"tmw\{username}"]);
        assert_eq!(cfg.user_attribute, "sAMAccountName");
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<LdapAuthNPluginConfig, _> =
            serde_json::from_str(r#"{"server":"tmw.com"}"#);

        assert!(result.is_err());
    }
}
