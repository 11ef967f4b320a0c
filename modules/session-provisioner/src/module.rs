//! Session provisioner module.

use std::sync::Arc;

use hub_security::UserContext;
use tracing::info;

use crate::config::SessionProvisionerConfig;
use crate::domain::{Materializer, ProvisioningError, SessionDescriptor, UserStorage};
use crate::policy::ProvisioningPolicy;

/// Session Provisioner module.
///
/// This module:
/// 1. Computes the [`ProvisioningPolicy`] once from its configuration
/// 2. Materializes every session descriptor before admission
pub struct SessionProvisioner {
    materializer: Materializer,
    policy: ProvisioningPolicy,
}

impl SessionProvisioner {
    #[must_use]
    pub fn init(cfg: &SessionProvisionerConfig, storage: Arc<dyn UserStorage>) -> Self {
        let policy = ProvisioningPolicy::from_config(cfg);
        info!(
            claim = %policy.claim_name,
            services = policy.services.len(),
            lab = cfg.enable_lab,
            "Initializing session_provisioner"
        );

        Self {
            materializer: Materializer::new(cfg, storage),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &ProvisioningPolicy {
        &self.policy
    }

    /// Admission hook: prepare `descriptor` for `user`.
    ///
    /// # Errors
    ///
    /// Propagates [`ProvisioningError`] from the materializer.
    pub fn admit(
        &self,
        user: &UserContext,
        descriptor: SessionDescriptor,
    ) -> Result<SessionDescriptor, ProvisioningError> {
        self.materializer.materialize(user, descriptor)
    }
}
