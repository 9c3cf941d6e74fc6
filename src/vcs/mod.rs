//! Perforce command layer
//!
//! - `runner`: spawns the p4 process with a timeout
//! - `classify`: turns process results into classified errors
//! - `p4`: the handful of p4 commands the registry needs
//! - `records`: parsers for their output
//! - `workspace`: the P4CLIENT lease

pub mod classify;
pub mod p4;
pub mod records;
mod runner;
mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use p4::P4;
pub use records::ChangeRecord;
pub use runner::{CommandRunner, Invocation, ProcessRunner};
pub use workspace::{WorkspaceContext, WorkspaceLease};
