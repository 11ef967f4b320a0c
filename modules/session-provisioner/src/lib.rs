//! Session Provisioner Module
//!
//! Prepares a user's notebook session before the orchestrator admits it:
//!
//! - derives a filesystem-safe identifier from the user name
//! - makes sure the user's directory exists on the shared volume
//! - appends environment entries and volume mounts to the session descriptor
//!
//! It also computes the static [`ProvisioningPolicy`] (storage claim,
//! resource limits, maintenance services) handed to the orchestrator once
//! at start-up.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;
pub mod policy;

pub use config::SessionProvisionerConfig;
pub use domain::{
    EnvVar, Expand, InterpolationContext, LocalUserStorage, Materializer, ProvisioningError,
    SessionDescriptor, UserStorage, VolumeMount, escape_identifier,
};
pub use module::SessionProvisioner;
pub use policy::{ProvisioningPolicy, ResourcePolicy, ServiceRegistration};
