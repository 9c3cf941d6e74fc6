//! Terminal interaction
//!
//! Prompts use `cliclack` and fall back to defaults when stdin/stdout is
//! not a terminal or a CI environment is detected, so the host package
//! manager can drive the adapter unattended.

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{intro, key_value, step_info, step_ok, step_warn_hint};
pub use prompts::{confirm, input};
