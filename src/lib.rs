//! p4reg - Perforce-backed package registry
//!
//! Serves package versions out of a Perforce depot: labels become
//! versions, the newest change becomes a development version, and
//! downloads are synced subtrees copied into the host's install location.

pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod ui;
pub mod vcs;

pub use error::{RegistryError, RegistryResult};
pub use registry::{P4Registry, RegistryProvider};
