//! `AuthN` Dispatcher SDK
//!
//! This crate provides the public API for the `authn_dispatcher` module:
//!
//! - [`AuthNDispatcherClient`] - Public API trait for consumers (the login handler)
//! - [`AuthNBackendPluginClient`] - Plugin API trait for per-domain backends
//! - [`LoginRequest`], [`Credentials`], [`AuthResult`] - Request and result models
//! - [`AuthNDispatcherError`] - Error types returned by backends
//!
//! ## Usage
//!
//! ```ignore
//! use authn_dispatcher_sdk::{AuthNDispatcherClient, AuthResult, LoginRequest};
//!
//! let request = LoginRequest::new("TMW", "Alice", password);
//! match dispatcher.authenticate(&request).await {
//!     AuthResult::Accepted(user) => spawn_session(user),
//!     AuthResult::Rejected => show_login_failed(),
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::AuthNDispatcherClient;
pub use error::AuthNDispatcherError;
pub use models::{AuthResult, AuthenticationResult, Credentials, LoginRequest};
pub use plugin_api::AuthNBackendPluginClient;
