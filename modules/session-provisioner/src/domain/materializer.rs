//! Per-user session materialization.

use std::path::PathBuf;
use std::sync::Arc;

use hub_security::UserContext;
use tracing::{debug, info};

use super::{
    EnvVar, Expand, InterpolationContext, ProvisioningError, SessionDescriptor, UserStorage,
    VolumeMount,
};
use crate::config::SessionProvisionerConfig;

/// Mutates a session descriptor for one user just before admission.
///
/// Holds only immutable templates, so one instance serves every admission
/// concurrently.
pub struct Materializer {
    storage: Arc<dyn UserStorage>,
    user_directory_template: String,
    master_files_path: String,
    admin_workspace_template: String,
    user_workspace: String,
    admin_mounts: Vec<VolumeMount>,
    user_mounts: Vec<VolumeMount>,
}

impl Materializer {
    #[must_use]
    pub fn new(cfg: &SessionProvisionerConfig, storage: Arc<dyn UserStorage>) -> Self {
        Self {
            storage,
            user_directory_template: cfg.user_directory_template.clone(),
            master_files_path: cfg.master_files_path.clone(),
            admin_workspace_template: cfg.admin_workspace_template.clone(),
            user_workspace: cfg.user_workspace.clone(),
            admin_mounts: cfg.admin_mounts.clone(),
            user_mounts: cfg.user_mounts.clone(),
        }
    }

    /// Prepare `descriptor` for `user`.
    ///
    /// Ensures the user's directory exists, then appends the workspace
    /// environment and the mount set matching the user's admin flag.
    /// Existing entries of the descriptor are never replaced.
    ///
    /// # Errors
    ///
    /// Returns `ProvisioningError::Storage` if the user directory cannot be
    /// created; the descriptor is dropped and the session must not start.
    #[tracing::instrument(skip_all, fields(user = %user.name(), admin = user.is_admin()))]
    pub fn materialize(
        &self,
        user: &UserContext,
        mut descriptor: SessionDescriptor,
    ) -> Result<SessionDescriptor, ProvisioningError> {
        let ctx = InterpolationContext::for_user(user);

        let (mounts, workspace) = if user.is_admin() {
            (
                &self.admin_mounts,
                ctx.interpolate(&self.admin_workspace_template),
            )
        } else {
            (&self.user_mounts, self.user_workspace.clone())
        };

        let directory = PathBuf::from(ctx.interpolate(&self.user_directory_template));
        self.storage
            .ensure_directory(&directory)
            .map_err(|source| ProvisioningError::Storage {
                path: directory.clone(),
                source,
            })?;
        debug!(path = %directory.display(), "User directory ready");

        descriptor.env.extend([
            EnvVar::new("JUPYTER_MASTER_FILES", &self.master_files_path),
            EnvVar::new("JUPYTER_WORKSPACE_NAME", &workspace),
            EnvVar::new("JUPYTER_SYNC_VOLUME", "true"),
        ]);
        descriptor.volume_mounts.extend(mounts.expand(&ctx));

        info!(
            safe_name = ctx.username(),
            workspace = %workspace,
            mounts = mounts.len(),
            "Session materialized"
        );
        Ok(descriptor)
    }
}
