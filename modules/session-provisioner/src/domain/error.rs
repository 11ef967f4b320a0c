//! Domain errors for the session provisioner.

use std::path::PathBuf;

/// Failures that must stop the session from being admitted.
#[derive(thiserror::Error, Debug)]
pub enum ProvisioningError {
    #[error("cannot create user directory {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
