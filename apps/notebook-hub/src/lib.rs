//! Notebook hub bootstrap.
//!
//! Reads the process configuration once, wires the directory backends into
//! the authentication dispatcher, and exposes the session provisioner through
//! a small CLI.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod logging;

pub use bootstrap::{OfflineConnector, build_dispatcher, build_provisioner};
pub use config::{ConfigError, HubConfig};
