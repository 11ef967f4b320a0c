//! Port to the directory-service protocol client.
//!
//! The host supplies an implementation backed by its LDAP library; the
//! backend only needs bind and subtree search.

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;

/// Where and how to reach a directory server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProfile {
    pub address: String,
    pub port: u16,
    pub use_ssl: bool,
}

/// One search result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Values of an attribute, matched case-insensitively as directories do.
    #[must_use]
    pub fn values(&self, attribute: &str) -> &[String] {
        self.attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
            .map_or(&[][..], |(_, values)| values.as_slice())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The server refused the bind.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server could not be reached or the connection broke.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The server answered with an unexpected result.
    #[error("directory protocol error: {0}")]
    Protocol(String),
}

/// Opens sessions to a directory server.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// # Errors
    ///
    /// Returns `Unavailable` if the server cannot be reached.
    async fn connect(
        &self,
        server: &ServerProfile,
    ) -> Result<Box<dyn DirectorySession>, DirectoryError>;
}

/// An open connection to a directory server.
#[async_trait]
pub trait DirectorySession: Send {
    /// Simple bind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` if the server rejects the bind.
    async fn simple_bind(&mut self, dn: &str, password: &SecretString)
    -> Result<(), DirectoryError>;

    /// Subtree search under `base`, returning only `attributes`.
    ///
    /// # Errors
    ///
    /// Returns `Protocol` or `Unavailable` if the search cannot be performed.
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError>;
}
