//! Static provisioning policy handed to the orchestrator at start-up.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::SessionProvisionerConfig;

/// Name of the service account used by the administrative REST API.
pub const REST_API_SERVICE: &str = "jupyterhub-rest-api-user";
pub const BACKUP_SERVICE: &str = "backup-users";
pub const CULL_IDLE_SERVICE: &str = "cull-idle";

/// Compute requests and limits per session. Absent values mean no limit.
///
/// Memory sizes are passed to the orchestrator verbatim (`"512M"`, `"2Gi"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_guarantee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_guarantee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<String>,
}

/// Shared volume backed by the notebooks storage claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedVolume {
    pub name: String,
    pub claim_name: String,
}

/// Auxiliary process registered with the hub.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRegistration {
    pub name: String,
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(skip)]
    api_token: Option<SecretString>,
}

impl ServiceRegistration {
    fn admin(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            admin: true,
            command: None,
            api_token: None,
        }
    }

    #[must_use]
    fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = Some(command);
        self
    }

    /// Token the service authenticates with, if one was configured.
    #[must_use]
    pub fn api_token(&self) -> Option<&SecretString> {
        self.api_token.as_ref()
    }
}

/// Everything the orchestrator needs once, before the first session.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningPolicy {
    pub claim_name: String,
    /// The claim is provisioned out of band and never created by the hub.
    pub storage_claim_ensure: bool,
    pub volumes: Vec<SharedVolume>,
    pub spawner_env: BTreeMap<String, String>,
    pub template_paths: Vec<String>,
    pub resources: ResourcePolicy,
    pub services: Vec<ServiceRegistration>,
}

impl ProvisioningPolicy {
    #[must_use]
    pub fn from_config(cfg: &SessionProvisionerConfig) -> Self {
        let claim_name = format!(
            "{}-notebooks-pvc{}",
            cfg.connect_address(),
            cfg.volume_version
        );

        let mut spawner_env = BTreeMap::new();
        if cfg.enable_lab {
            spawner_env.insert("JUPYTER_ENABLE_LAB".to_owned(), "true".to_owned());
        }

        let mut rest_api = ServiceRegistration::admin(REST_API_SERVICE);
        rest_api.api_token.clone_from(&cfg.rest_api_password);

        let mut services = vec![
            rest_api,
            ServiceRegistration::admin(BACKUP_SERVICE).with_command(vec![
                "backup-user-details".to_owned(),
                format!("--backups={}", cfg.backups_path),
                format!("--config-map={}-cfg-backup", cfg.service_name),
            ]),
        ];
        if let Some(timeout) = cfg.idle_timeout_secs.filter(|t| *t > 0) {
            services.push(
                ServiceRegistration::admin(CULL_IDLE_SERVICE).with_command(vec![
                    "cull-idle-servers".to_owned(),
                    format!("--timeout={timeout}"),
                ]),
            );
        }

        Self {
            volumes: vec![SharedVolume {
                name: cfg.volume_name.clone(),
                claim_name: claim_name.clone(),
            }],
            claim_name,
            storage_claim_ensure: false,
            spawner_env,
            template_paths: cfg.template_paths.clone(),
            resources: cfg.resources.clone(),
            services,
        }
    }

    #[must_use]
    pub fn service(&self, name: &str) -> Option<&ServiceRegistration> {
        self.services.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn claim_name_joins_address_and_version() {
        let cfg = SessionProvisionerConfig {
            connect_address: Some("hub-prod".to_owned()),
            volume_version: "2".to_owned(),
            ..SessionProvisionerConfig::default()
        };

        let policy = ProvisioningPolicy::from_config(&cfg);

        assert_eq!(policy.claim_name, "hub-prod-notebooks-pvc2");
        assert!(!policy.storage_claim_ensure);
        assert_eq!(
            policy.volumes,
            vec![SharedVolume {
                name: "notebooks".to_owned(),
                claim_name: "hub-prod-notebooks-pvc2".to_owned(),
            }]
        );
    }

    #[test]
    fn defaults_register_rest_api_and_backup_only() {
        let policy = ProvisioningPolicy::from_config(&SessionProvisionerConfig::default());

        let names: Vec<&str> = policy.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, [REST_API_SERVICE, BACKUP_SERVICE]);
        assert!(policy.services.iter().all(|s| s.admin));
        assert_eq!(
            policy.service(BACKUP_SERVICE).unwrap().command.as_deref(),
            Some(
                &[
                    "backup-user-details".to_owned(),
                    "--backups=/opt/app-root/notebooks/backups".to_owned(),
                    "--config-map=jupyterhub-cfg-backup".to_owned(),
                ][..]
            )
        );
        assert!(policy.spawner_env.is_empty());
    }

    #[test]
    fn zero_idle_timeout_disables_culling() {
        let cfg = SessionProvisionerConfig {
            idle_timeout_secs: Some(0),
            ..SessionProvisionerConfig::default()
        };

        let policy = ProvisioningPolicy::from_config(&cfg);

        assert!(policy.service(CULL_IDLE_SERVICE).is_none());
    }

    #[test]
    fn idle_timeout_registers_culler() {
        let cfg = SessionProvisionerConfig {
            idle_timeout_secs: Some(3600),
            enable_lab: true,
            ..SessionProvisionerConfig::default()
        };

        let policy = ProvisioningPolicy::from_config(&cfg);

        let culler = policy.service(CULL_IDLE_SERVICE).unwrap();
        assert_eq!(
            culler.command.as_deref(),
            Some(&["cull-idle-servers".to_owned(), "--timeout=3600".to_owned()][..])
        );
        assert_eq!(
            policy.spawner_env.get("JUPYTER_ENABLE_LAB").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn rest_api_token_is_never_serialized() {
        let cfg = SessionProvisionerConfig {
            rest_api_password: Some(SecretString::from("s3cret-token".to_owned())),
            ..SessionProvisionerConfig::default()
        };

        let policy = ProvisioningPolicy::from_config(&cfg);
        let json = serde_json::to_string(&policy).unwrap();

        assert_eq!(
            policy
                .service(REST_API_SERVICE)
                .and_then(ServiceRegistration::api_token)
                .map(ExposeSecret::expose_secret),
            Some("s3cret-token")
        );
        assert!(!json.contains("s3cret-token"));
        assert!(!format!("{policy:?}").contains("s3cret-token"));
    }

    #[test]
    fn resources_serialize_only_present_limits() {
        let cfg = SessionProvisionerConfig {
            resources: ResourcePolicy {
                cpu_limit: Some(2.5),
                mem_limit: Some("2Gi".to_owned()),
                ..ResourcePolicy::default()
            },
            ..SessionProvisionerConfig::default()
        };

        let policy = ProvisioningPolicy::from_config(&cfg);

        assert_eq!(
            serde_json::to_value(&policy.resources).unwrap(),
            serde_json::json!({"cpu_limit": 2.5, "mem_limit": "2Gi"})
        );
    }
}
