//! Public API trait for the `AuthN` dispatcher.
//!
//! This trait defines the interface the login front-end uses to
//! authenticate a submitted form. The dispatcher implements it and
//! delegates to the backend registered for the request's domain.

use async_trait::async_trait;

use crate::models::{AuthResult, LoginRequest};

/// Public API trait for the `AuthN` dispatcher.
///
/// Unlike the backend trait, this call is total: every failure mode
/// (unknown domain, bad credentials, directory outage) collapses into
/// [`AuthResult::Rejected`] so the caller can only show a generic
/// "login failed" message.
#[async_trait]
pub trait AuthNDispatcherClient: Send + Sync {
    /// Authenticate a login submission.
    ///
    /// Domain and username are matched case-insensitively.
    async fn authenticate(&self, request: &LoginRequest) -> AuthResult;
}
