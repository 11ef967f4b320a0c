//! Domain layer for the directory `AuthN` backend.

pub mod client;
pub mod directory;
pub mod service;

pub use directory::{
    DirectoryConnector, DirectoryEntry, DirectoryError, DirectorySession, ServerProfile,
};
pub use service::Service;
