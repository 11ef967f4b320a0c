//! Domain layer for the `AuthN` dispatcher.

pub mod access_policy;
pub mod error;
pub mod local_client;
pub mod registry;
pub mod service;

pub use access_policy::{AccessPolicy, UserListError};
pub use error::DomainError;
pub use local_client::AuthNDispatcherLocalClient;
pub use registry::{BackendRegistry, BackendRegistryBuilder, RegistryError};
pub use service::Service;
