//! Domain errors for the `AuthN` dispatcher.

use authn_dispatcher_sdk::AuthNDispatcherError;

/// Errors of a single login attempt.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("unknown authentication domain '{domain}'")]
    UnknownDomain { domain: String },

    #[error("user '{username}' is not permitted to log in")]
    NotPermitted { username: String },

    #[error("backend rejected login: {0}")]
    Backend(#[from] AuthNDispatcherError),
}

