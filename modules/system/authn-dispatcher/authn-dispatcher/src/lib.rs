//! `AuthN` Dispatcher Module
//!
//! Routes login submissions to the authentication backend registered for
//! the submitted domain, then applies the hub's administrator and allow
//! lists to the verified identity.
//!
//! Provides the `AuthNDispatcherClient` implementation consumed by the
//! login front-end.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use domain::{AccessPolicy, BackendRegistry, RegistryError, UserListError};
pub use module::AuthNDispatcher;
