//! Client implementation for the directory `AuthN` backend.
//!
//! Implements `AuthNBackendPluginClient` using the domain service.

use async_trait::async_trait;
use authn_dispatcher_sdk::{
    AuthNBackendPluginClient, AuthNDispatcherError, AuthenticationResult, Credentials,
};
use hub_security::UserContext;

use super::service::Service;

#[async_trait]
impl AuthNBackendPluginClient for Service {
    fn kind(&self) -> &'static str {
        "ldap"
    }

    async fn authenticate(
        &self,
        domain: &str,
        credentials: &Credentials,
    ) -> Result<AuthenticationResult, AuthNDispatcherError> {
        let username = self.verify(credentials).await?;
        Ok(AuthenticationResult {
            user: UserContext::builder().name(username).domain(domain).build(),
        })
    }
}
