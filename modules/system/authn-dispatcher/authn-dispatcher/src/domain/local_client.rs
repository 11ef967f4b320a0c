//! Local (in-process) client for the `AuthN` dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use authn_dispatcher_sdk::{AuthNDispatcherClient, AuthNDispatcherError, AuthResult, LoginRequest};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Collapses every failure into [`AuthResult::Rejected`].
pub struct AuthNDispatcherLocalClient {
    svc: Arc<Service>,
}

impl AuthNDispatcherLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_rejection(e: &DomainError) {
    match e {
        // Already reported by the service with the offending domain.
        DomainError::UnknownDomain { .. } => {}
        DomainError::NotPermitted { username } => {
            tracing::info!(username = %username, "Login rejected by allow list");
        }
        DomainError::Backend(AuthNDispatcherError::Unauthorized(reason)) => {
            tracing::debug!(reason = %reason, "Login rejected by backend");
        }
        DomainError::Backend(other) => {
            tracing::error!(error = %other, "authn backend call failed");
        }
    }
}

#[async_trait]
impl AuthNDispatcherClient for AuthNDispatcherLocalClient {
    async fn authenticate(&self, request: &LoginRequest) -> AuthResult {
        match self.svc.authenticate(request).await {
            Ok(user) => AuthResult::Accepted(user),
            Err(e) => {
                log_rejection(&e);
                AuthResult::Rejected
            }
        }
    }
}
