//! Registry of authentication backends keyed by domain.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use authn_dispatcher_sdk::AuthNBackendPluginClient;

/// Errors raised while assembling the registry at start-up.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("domain '{domain}' already has a backend registered")]
    DuplicateDomain { domain: String },

    #[error("domain key must not be empty")]
    EmptyDomain,
}

/// Immutable mapping from lowercase domain key to its backend.
///
/// Built once through [`BackendRegistry::builder`]; there is no way to add
/// or remove a backend afterwards, so the registry is shared between
/// requests without locking.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn AuthNBackendPluginClient>>,
}

impl BackendRegistry {
    #[must_use]
    pub fn builder() -> BackendRegistryBuilder {
        BackendRegistryBuilder::default()
    }

    /// Look up the backend for an already-normalized domain key.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&Arc<dyn AuthNBackendPluginClient>> {
        self.backends.get(domain)
    }

    /// Registered domain keys, sorted.
    #[must_use]
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        domains.sort_unstable();
        domains
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for domain in self.domains() {
            if let Some(backend) = self.backends.get(domain) {
                map.entry(&domain, &backend.kind());
            }
        }
        map.finish()
    }
}

#[derive(Default)]
pub struct BackendRegistryBuilder {
    backends: HashMap<String, Arc<dyn AuthNBackendPluginClient>>,
}

impl BackendRegistryBuilder {
    /// Register `backend` under `domain`.
    ///
    /// The key is lowercased. A single backend may be registered under
    /// several keys, but each key maps to exactly one backend.
    ///
    /// # Errors
    ///
    /// - `EmptyDomain` if the key is blank
    /// - `DuplicateDomain` if the key is already taken
    pub fn register(
        mut self,
        domain: &str,
        backend: Arc<dyn AuthNBackendPluginClient>,
    ) -> Result<Self, RegistryError> {
        let key = domain.trim().to_lowercase();
        if key.is_empty() {
            return Err(RegistryError::EmptyDomain);
        }
        if self.backends.contains_key(&key) {
            return Err(RegistryError::DuplicateDomain { domain: key });
        }
        self.backends.insert(key, backend);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> BackendRegistry {
        BackendRegistry {
            backends: self.backends,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_dispatcher_sdk::{AuthNDispatcherError, AuthenticationResult, Credentials};

    use super::*;

    struct NullBackend;

    #[async_trait]
    impl AuthNBackendPluginClient for NullBackend {
        fn kind(&self) -> &'static str {
            "null"
        }

        async fn authenticate(
            &self,
            _domain: &str,
            _credentials: &Credentials,
        ) -> Result<AuthenticationResult, AuthNDispatcherError> {
            Err(AuthNDispatcherError::Unauthorized("null backend".to_owned()))
        }
    }

    #[test]
    fn register_lowercases_domain_key() {
        let registry = BackendRegistry::builder()
            .register("TMW", Arc::new(NullBackend))
            .unwrap()
            .build();

        assert!(registry.get("tmw").is_some());
        assert!(registry.get("TMW").is_none());
        assert_eq!(registry.domains(), vec!["tmw"]);
    }

    #[test]
    fn register_rejects_duplicate_domain_case_insensitively() {
        let result = BackendRegistry::builder()
            .register("tmw", Arc::new(NullBackend))
            .unwrap()
            .register("Tmw", Arc::new(NullBackend));

        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicateDomain {
                domain: "tmw".to_owned()
            })
        );
    }

    #[test]
    fn register_rejects_blank_domain() {
        let result = BackendRegistry::builder().register("  ", Arc::new(NullBackend));

        assert_eq!(result.err(), Some(RegistryError::EmptyDomain));
    }

    #[test]
    fn one_backend_can_serve_several_domains() {
        let backend: Arc<dyn AuthNBackendPluginClient> = Arc::new(NullBackend);
        let registry = BackendRegistry::builder()
            .register("tmw", backend.clone())
            .unwrap()
            .register("tmw-alias", backend)
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.domains(), vec!["tmw", "tmw-alias"]);
    }

    #[test]
    fn debug_lists_domains_and_kinds() {
        let registry = BackendRegistry::builder()
            .register("tmw", Arc::new(NullBackend))
            .unwrap()
            .build();

        assert_eq!(format!("{registry:?}"), r#"{"tmw": "null"}"#);
    }
}
