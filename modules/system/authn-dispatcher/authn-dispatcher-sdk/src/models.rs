//! Domain models for the `AuthN` dispatcher module.

use hub_security::UserContext;
use secrecy::SecretString;
use serde::Deserialize;

/// A login form submission.
///
/// Field names match the login form: `domain`, `username`, `password`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub domain: String,
    pub username: String,
    /// Never logged; `Debug` redacts it.
    pub password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn new(domain: &str, username: &str, password: impl Into<SecretString>) -> Self {
        Self {
            domain: domain.to_owned(),
            username: username.to_owned(),
            password: password.into(),
        }
    }

    /// Trimmed, lowercased domain key used to select a backend.
    #[must_use]
    pub fn domain_key(&self) -> String {
        self.domain.trim().to_lowercase()
    }

    /// Credentials with the username lowercased, as handed to a backend.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.to_lowercase(),
            password: self.password.clone(),
        }
    }
}

/// Normalized credentials passed to a backend.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Lowercase username.
    pub username: String,
    pub password: SecretString,
}

/// Result of a successful backend authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Identity of the authenticated user. The hub assigns the numeric id
    /// and the administrator flag afterwards.
    pub user: UserContext,
}

/// Outcome of a dispatched login.
///
/// There is no third state: anything that is not a verified identity is a
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Accepted(UserContext),
    Rejected,
}

impl AuthResult {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted identity, if any.
    #[must_use]
    pub fn into_user(self) -> Option<UserContext> {
        match self {
            Self::Accepted(user) => Some(user),
            Self::Rejected => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn login_request_normalizes_domain_and_username() {
        let request = LoginRequest::new("TMW", "Alice.Smith", "pw".to_owned());

        assert_eq!(request.domain_key(), "tmw");
        let credentials = request.credentials();
        assert_eq!(credentials.username, "alice.smith");
        assert_eq!(credentials.password.expose_secret(), "pw");
    }

    #[test]
    fn login_request_debug_redacts_password() {
        let request = LoginRequest::new("tmw", "alice", "hunter2".to_owned());

        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn login_request_deserializes_from_form_fields() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"domain":"Tmw","username":"Bob","password":"x"}"#).unwrap();

        assert_eq!(request.domain_key(), "tmw");
        assert_eq!(request.credentials().username, "bob");
    }

    #[test]
    fn auth_result_into_user() {
        let user = UserContext::builder().name("alice").build();

        assert_eq!(
            AuthResult::Accepted(user.clone()).into_user(),
            Some(user.clone())
        );
        assert!(AuthResult::Accepted(user).is_accepted());
        assert!(AuthResult::Rejected.into_user().is_none());
        assert!(!AuthResult::Rejected.is_accepted());
    }
}
