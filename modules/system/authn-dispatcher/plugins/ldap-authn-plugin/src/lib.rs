#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Directory `AuthN` Backend Plugin
//!
//! Verifies hub logins against one directory service (Active Directory or
//! any LDAP server) per domain. The wire protocol is provided by the host
//! through the [`DirectoryConnector`] port; this crate owns the login flow.
//!
//! ## Lookup modes
//!
//! - **`search_then_bind`** (default): binds with a service account, searches
//!   the user by `user_attribute`, reads `lookup_dn_user_dn_attribute` from
//!   the match and binds as the user through each `bind_dn_templates` entry.
//!
//! - **`direct_bind`**: skips the search and renders the bind templates with
//!   the login name itself.
//!
//! ## Configuration
//!
//! ```yaml
//! domains: ["tmw"]
//! server_address: "tmw.com"
//! use_ssl: true
//! bind_dn_templates: ['tmw\{username}']
//! user_search_base: "DC=tmw"
//! lookup_mode: search_then_bind
//! lookup_dn_search_filter: "({login_attr}={login})"
//! user_attribute: "sAMAccountName"
//! lookup_dn_user_dn_attribute: "sAMAccountName"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::{LdapAuthNPluginConfig, LookupMode};
pub use domain::{
    DirectoryConnector, DirectoryEntry, DirectoryError, DirectorySession, ServerProfile, Service,
};
pub use module::{ConfigError, LdapAuthNPlugin};
