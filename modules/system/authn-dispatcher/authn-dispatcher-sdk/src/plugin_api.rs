//! Plugin API trait for per-domain authentication backends.
//!
//! Backends implement this trait to verify credentials against one
//! directory service. The dispatcher keeps one backend per domain key and
//! delegates to it.

use async_trait::async_trait;

use crate::error::AuthNDispatcherError;
use crate::models::{AuthenticationResult, Credentials};

/// Plugin API trait for authentication backends.
#[async_trait]
pub trait AuthNBackendPluginClient: Send + Sync {
    /// Short backend kind used in diagnostics (e.g. `"ldap"`).
    fn kind(&self) -> &'static str;

    /// Verify the credentials and return the authenticated identity.
    ///
    /// # Arguments
    ///
    /// * `domain` - The normalized (lowercase) domain key the request was routed by
    /// * `credentials` - Normalized username and the submitted secret
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the credentials are rejected or malformed
    /// - `ServiceUnavailable` if the directory service cannot be reached
    /// - `Internal` for unexpected errors
    async fn authenticate(
        &self,
        domain: &str,
        credentials: &Credentials,
    ) -> Result<AuthenticationResult, AuthNDispatcherError>;
}
