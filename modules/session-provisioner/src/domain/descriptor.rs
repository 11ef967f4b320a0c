//! Session descriptor: the part of a notebook pod the provisioner touches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::interpolation::{Expand, InterpolationContext};

/// Mutable description of a session about to be admitted.
///
/// Fields the provisioner does not manage are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    #[serde(default)]
    pub env: Vec<EnvVar>,

    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Environment entry. Later entries win over earlier ones with the same name.
///
/// Entries sourced elsewhere (`valueFrom`) have no literal `value`; their
/// source stays in `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvVar {
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_owned(),
            value: Some(value.to_owned()),
            extra: Map::new(),
        }
    }
}

/// Volume mount, possibly containing `{username}` / `{userid}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// `mountPropagation`, `subPathExpr` and other orchestrator fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VolumeMount {
    #[must_use]
    pub fn new(name: &str, mount_path: &str, sub_path: &str) -> Self {
        Self {
            name: name.to_owned(),
            mount_path: mount_path.to_owned(),
            sub_path: Some(sub_path.to_owned()),
            read_only: None,
            extra: Map::new(),
        }
    }
}

impl Expand for VolumeMount {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        Self {
            name: self.name.expand(ctx),
            mount_path: self.mount_path.expand(ctx),
            sub_path: self.sub_path.expand(ctx),
            read_only: self.read_only,
            extra: self
                .extra
                .iter()
                .map(|(key, value)| (key.clone(), value.expand(ctx)))
                .collect(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use hub_security::UserContext;
    use serde_json::json;

    use super::*;

    #[test]
    fn descriptor_round_trips_unknown_fields() {
        let raw = json!({
            "image": "notebook:latest",
            "env": [{"name": "A", "value": "1"}],
            "volumeMounts": [{"name": "data", "mountPath": "/data"}],
            "resources": {"limits": {"cpu": "2"}},
        });

        let descriptor: SessionDescriptor = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(descriptor.env, vec![EnvVar::new("A", "1")]);
        assert_eq!(descriptor.volume_mounts[0].sub_path, None);
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), raw);
    }

    #[test]
    fn orchestrator_entries_survive_round_trip() {
        let raw = json!({
            "env": [
                {"name": "POD_IP", "valueFrom": {"fieldRef": {"fieldPath": "status.podIP"}}},
                {"name": "A", "value": "1"},
            ],
            "volumeMounts": [
                {"name": "shm", "mountPath": "/dev/shm", "mountPropagation": "None"},
                {"name": "logs", "mountPath": "/logs", "subPathExpr": "$(POD_NAME)", "readOnly": true},
            ],
        });

        let descriptor: SessionDescriptor = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(descriptor.env[0].value, None);
        assert_eq!(
            descriptor.env[0].extra["valueFrom"]["fieldRef"]["fieldPath"],
            "status.podIP"
        );
        assert_eq!(descriptor.env[1], EnvVar::new("A", "1"));
        assert_eq!(descriptor.volume_mounts[0].extra["mountPropagation"], "None");
        assert_eq!(descriptor.volume_mounts[1].read_only, Some(true));
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), raw);
    }

    #[test]
    fn mount_template_expands_extra_fields() {
        let mut mount = VolumeMount::new("data", "/data/{username}", "users/{username}");
        mount
            .extra
            .insert("mountPropagation".to_owned(), json!("HostToContainer"));
        mount
            .extra
            .insert("subPathExpr".to_owned(), json!("home/{username}"));

        let user = UserContext::builder().name("Bob Smith").id(7).build();

        let expanded = mount.expand(&InterpolationContext::for_user(&user));

        assert_eq!(expanded.mount_path, "/data/-42ob-20-53mith");
        assert_eq!(expanded.extra["mountPropagation"], "HostToContainer");
        assert_eq!(expanded.extra["subPathExpr"], "home/-42ob-20-53mith");
    }

    #[test]
    fn empty_descriptor_deserializes() {
        let descriptor: SessionDescriptor = serde_json::from_value(json!({})).unwrap();

        assert_eq!(descriptor, SessionDescriptor::default());
    }
}
