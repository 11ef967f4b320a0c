//! Domain layer for the session provisioner.

pub mod descriptor;
pub mod error;
pub mod interpolation;
pub mod materializer;
pub mod storage;

pub use descriptor::{EnvVar, SessionDescriptor, VolumeMount};
pub use error::ProvisioningError;
pub use interpolation::{Expand, InterpolationContext, escape_identifier};
pub use materializer::Materializer;
pub use storage::{LocalUserStorage, UserStorage};
