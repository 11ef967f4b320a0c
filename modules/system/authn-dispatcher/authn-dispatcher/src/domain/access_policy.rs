//! Administrator and allow lists applied after a backend accepts a login.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::AuthNDispatcherConfig;

/// A user list file exists but cannot be read. Raised at start-up only.
#[derive(thiserror::Error, Debug)]
#[error("failed to read user list {path}: {source}")]
pub struct UserListError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// User lists loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admin_users: HashSet<String>,
    allowed_users: HashSet<String>,
}

impl AccessPolicy {
    #[must_use]
    pub fn new<A, B>(admin_users: A, allowed_users: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Self {
            admin_users: normalize(admin_users),
            allowed_users: normalize(allowed_users),
        }
    }

    /// Read both lists from the files named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UserListError`] if a file exists but cannot be read.
    pub fn load(cfg: &AuthNDispatcherConfig) -> Result<Self, UserListError> {
        Ok(Self {
            admin_users: read_user_list(&cfg.admin_users_file)?,
            allowed_users: read_user_list(&cfg.allowed_users_file)?,
        })
    }

    #[must_use]
    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_users.contains(username)
    }

    /// An empty allow list admits everyone; administrators are always admitted.
    #[must_use]
    pub fn is_allowed(&self, username: &str) -> bool {
        self.allowed_users.is_empty()
            || self.allowed_users.contains(username)
            || self.is_admin(username)
    }

    #[must_use]
    pub fn admin_count(&self) -> usize {
        self.admin_users.len()
    }

    #[must_use]
    pub fn allowed_count(&self) -> usize {
        self.allowed_users.len()
    }
}

/// Parse a whitespace-separated user list.
#[must_use]
pub fn parse_user_list(content: &str) -> HashSet<String> {
    normalize(content.split_whitespace())
}

fn normalize<I>(names: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

fn read_user_list(path: &Path) -> Result<HashSet<String>, UserListError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_user_list(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "User list not present");
            Ok(HashSet::new())
        }
        Err(source) => Err(UserListError {
            path: path.to_path_buf(),
            source,
        }),
    }
}
