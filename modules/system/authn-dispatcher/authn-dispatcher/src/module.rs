//! `AuthN` dispatcher module.

use std::sync::Arc;

use authn_dispatcher_sdk::AuthNDispatcherClient;
use tracing::info;

use crate::config::AuthNDispatcherConfig;
use crate::domain::{
    AccessPolicy, AuthNDispatcherLocalClient, BackendRegistry, Service, UserListError,
};

/// `AuthN` Dispatcher module.
///
/// This module:
/// 1. Loads the administrator and allow lists
/// 2. Takes ownership of the backend registry assembled by the host
/// 3. Exposes an [`AuthNDispatcherClient`] for the login front-end
pub struct AuthNDispatcher {
    service: Arc<Service>,
}

impl AuthNDispatcher {
    /// Initialize the module from its configuration and a populated registry.
    ///
    /// # Errors
    ///
    /// Returns [`UserListError`] if one of the user list files cannot be read.
    #[tracing::instrument(skip_all)]
    pub fn init(
        cfg: &AuthNDispatcherConfig,
        registry: BackendRegistry,
    ) -> Result<Self, UserListError> {
        let policy = AccessPolicy::load(cfg)?;
        Ok(Self::with_policy(registry, policy))
    }

    /// Build the module from an already loaded access policy.
    #[must_use]
    pub fn with_policy(registry: BackendRegistry, policy: AccessPolicy) -> Self {
        if registry.is_empty() {
            tracing::warn!("No authentication backends registered; every login will be rejected");
        }
        info!(
            domains = ?registry.domains(),
            admins = policy.admin_count(),
            allowed = policy.allowed_count(),
            "Initializing authn_dispatcher"
        );

        Self {
            service: Arc::new(Service::new(Arc::new(registry), policy)),
        }
    }

    /// Client registered for consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn AuthNDispatcherClient> {
        Arc::new(AuthNDispatcherLocalClient::new(self.service.clone()))
    }

    #[must_use]
    pub fn registry(&self) -> &BackendRegistry {
        self.service.registry()
    }
}
