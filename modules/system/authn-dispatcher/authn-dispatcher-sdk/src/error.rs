//! Error types for the `AuthN` dispatcher module.

use thiserror::Error;

/// Errors a backend can report for a single login attempt.
///
/// None of these reach the login front-end: the dispatcher turns all of
/// them into a plain rejection.
#[derive(Debug, Error)]
pub enum AuthNDispatcherError {
    /// The credentials are invalid or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The directory service is not reachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
