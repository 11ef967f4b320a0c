//! Configuration for the `AuthN` dispatcher.

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNDispatcherConfig {
    /// Whitespace-separated list of administrator user names.
    ///
    /// A missing file means there are no administrators.
    pub admin_users_file: PathBuf,

    /// Whitespace-separated list of user names permitted to log in.
    ///
    /// A missing or empty file means every authenticated user is permitted.
    pub allowed_users_file: PathBuf,
}

impl Default for AuthNDispatcherConfig {
    fn default() -> Self {
        Self {
            admin_users_file: PathBuf::from("/opt/app-root/configs/admin_users.txt"),
            allowed_users_file: PathBuf::from("/opt/app-root/configs/user_whitelist.txt"),
        }
    }
}
