//! Multi-domain login dispatch.

use std::sync::Arc;

use authn_dispatcher_sdk::LoginRequest;
use hub_security::UserContext;
use tracing::{debug, warn};

use super::{AccessPolicy, BackendRegistry, DomainError};

/// `AuthN` dispatcher service.
///
/// A login moves through three steps:
/// 1. received: domain and username are lowercased
/// 2. dispatched: the domain key selects a backend from the registry
/// 3. resolved: the backend's verdict, filtered through the access policy
pub struct Service {
    registry: Arc<BackendRegistry>,
    policy: AccessPolicy,
}

impl Service {
    #[must_use]
    pub fn new(registry: Arc<BackendRegistry>, policy: AccessPolicy) -> Self {
        Self { registry, policy }
    }

    #[must_use]
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Authenticate a login submission.
    ///
    /// # Errors
    ///
    /// - `UnknownDomain` if no backend is registered for the domain
    /// - `Backend` if the backend rejects the credentials or fails
    /// - `NotPermitted` if the user is not on a non-empty allow list
    #[tracing::instrument(skip_all, fields(domain, username))]
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<UserContext, DomainError> {
        let domain = request.domain_key();
        let credentials = request.credentials();
        let span = tracing::Span::current();
        span.record("domain", domain.as_str());
        span.record("username", credentials.username.as_str());

        let Some(backend) = self.registry.get(&domain) else {
            warn!(
                domain = %domain,
                username = %credentials.username,
                "Unknown authentication domain name"
            );
            return Err(DomainError::UnknownDomain { domain });
        };

        debug!(backend = backend.kind(), "Dispatching login to domain backend");
        let result = backend.authenticate(&domain, &credentials).await?;

        let username = result.user.name().to_owned();
        if !self.policy.is_allowed(&username) {
            return Err(DomainError::NotPermitted { username });
        }

        let admin = self.policy.is_admin(&username);
        Ok(result.user.with_admin(admin))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_dispatcher_sdk::{
        AuthNBackendPluginClient, AuthNDispatcherError, AuthenticationResult, Credentials,
    };
    use secrecy::ExposeSecret;

    use super::*;

    /// Accepts exactly one username/password pair.
    struct SingleUserBackend {
        username: &'static str,
        password: &'static str,
    }

    #[async_trait]
    impl AuthNBackendPluginClient for SingleUserBackend {
        fn kind(&self) -> &'static str {
            "single-user"
        }

        async fn authenticate(
            &self,
            domain: &str,
            credentials: &Credentials,
        ) -> Result<AuthenticationResult, AuthNDispatcherError> {
            if credentials.username == self.username
                && credentials.password.expose_secret() == self.password
            {
                Ok(AuthenticationResult {
                    user: UserContext::builder()
                        .name(credentials.username.clone())
                        .domain(domain)
                        .build(),
                })
            } else {
                Err(AuthNDispatcherError::Unauthorized(
                    "invalid credentials".to_owned(),
                ))
            }
        }
    }

    fn service(policy: AccessPolicy) -> Service {
        let registry = BackendRegistry::builder()
            .register(
                "tmw",
                Arc::new(SingleUserBackend {
                    username: "alice",
                    password: "secret",
                }),
            )
            .unwrap()
            .build();
        Service::new(Arc::new(registry), policy)
    }

    #[tokio::test]
    async fn accepts_valid_credentials() {
        let svc = service(AccessPolicy::default());

        let user = svc
            .authenticate(&LoginRequest::new("tmw", "alice", "secret".to_owned()))
            .await
            .unwrap();

        assert_eq!(user.name(), "alice");
        assert_eq!(user.domain(), Some("tmw"));
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn matches_domain_and_username_case_insensitively() {
        let svc = service(AccessPolicy::default());

        let user = svc
            .authenticate(&LoginRequest::new("TMW", "Alice", "secret".to_owned()))
            .await
            .unwrap();

        assert_eq!(user.name(), "alice");
    }

    #[tokio::test]
    async fn unknown_domain_is_reported() {
        let svc = service(AccessPolicy::default());

        let err = svc
            .authenticate(&LoginRequest::new("unknown", "bob", "x".to_owned()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnknownDomain { domain } if domain == "unknown"));
    }

    #[tokio::test]
    async fn backend_rejection_is_propagated() {
        let svc = service(AccessPolicy::default());

        let err = svc
            .authenticate(&LoginRequest::new("tmw", "alice", "wrong".to_owned()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::Backend(AuthNDispatcherError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn admin_list_sets_admin_flag() {
        let svc = service(AccessPolicy::new(["alice"], Vec::<String>::new()));

        let user = svc
            .authenticate(&LoginRequest::new("tmw", "alice", "secret".to_owned()))
            .await
            .unwrap();

        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn allow_list_excludes_unlisted_user() {
        let svc = service(AccessPolicy::new(Vec::<String>::new(), ["carol"]));

        let err = svc
            .authenticate(&LoginRequest::new("tmw", "alice", "secret".to_owned()))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotPermitted { username } if username == "alice"));
    }
}
