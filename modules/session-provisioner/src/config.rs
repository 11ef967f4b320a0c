//! Configuration for the session provisioner.

use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::VolumeMount;
use crate::policy::ResourcePolicy;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionProvisionerConfig {
    /// Host name sessions use to reach the hub; prefixes the storage claim
    /// name. Absent means the service name.
    pub connect_address: Option<String>,

    /// Name of the hub service; used for the backup config map.
    pub service_name: String,

    /// Name of the shared notebooks volume.
    pub volume_name: String,

    /// Appended to the storage claim name, lets a new volume replace an old one.
    pub volume_version: String,

    /// Directory created for every user before the session starts.
    pub user_directory_template: String,

    /// Value of `JUPYTER_MASTER_FILES`.
    pub master_files_path: String,

    /// Workspace name for administrators, expanded per user.
    pub admin_workspace_template: String,

    /// Workspace name for everyone else.
    pub user_workspace: String,

    /// Mounts for administrators: the whole users tree.
    pub admin_mounts: Vec<VolumeMount>,

    /// Mounts for everyone else: only the user's own directory.
    pub user_mounts: Vec<VolumeMount>,

    /// Start sessions with the lab interface.
    pub enable_lab: bool,

    /// Directories with customised front-end templates.
    pub template_paths: Vec<String>,

    pub resources: ResourcePolicy,

    /// Idle sessions are culled after this many seconds. Absent or zero
    /// disables the culling service.
    pub idle_timeout_secs: Option<u64>,

    /// Where the backup service writes user details.
    pub backups_path: String,

    /// Token for the administrative REST API user. Absent leaves the
    /// service without a token.
    pub rest_api_password: Option<SecretString>,
}

impl SessionProvisionerConfig {
    /// The configured connect address, else the service name.
    #[must_use]
    pub fn connect_address(&self) -> &str {
        self.connect_address.as_deref().unwrap_or(&self.service_name)
    }
}

impl Default for SessionProvisionerConfig {
    fn default() -> Self {
        Self {
            connect_address: None,
            service_name: "jupyterhub".to_owned(),
            volume_name: "notebooks".to_owned(),
            volume_version: String::new(),
            user_directory_template: "/opt/app-root/notebooks/users/{username}".to_owned(),
            master_files_path: "/opt/app-root/master".to_owned(),
            admin_workspace_template: "users/{username}/workspace".to_owned(),
            user_workspace: "workspace".to_owned(),
            admin_mounts: vec![VolumeMount::new(
                "notebooks",
                "/opt/app-root/src/users",
                "users",
            )],
            user_mounts: vec![VolumeMount::new(
                "notebooks",
                "/opt/app-root/src",
                "users/{username}",
            )],
            enable_lab: false,
            template_paths: vec!["/opt/app-root/src/templates".to_owned()],
            resources: ResourcePolicy::default(),
            idle_timeout_secs: None,
            backups_path: "/opt/app-root/notebooks/backups".to_owned(),
            rest_api_password: None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn connect_address_falls_back_to_service_name() {
        let mut cfg = SessionProvisionerConfig {
            service_name: "datahub".to_owned(),
            ..SessionProvisionerConfig::default()
        };
        assert_eq!(cfg.connect_address(), "datahub");

        cfg.connect_address = Some("hub-prod".to_owned());
        assert_eq!(cfg.connect_address(), "hub-prod");
    }
}
