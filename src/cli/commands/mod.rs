//! CLI command implementations

pub mod cache;
pub mod config;
pub mod configure;
pub mod download;
pub mod lookup;
pub mod manifest;

pub use cache::execute as cache;
pub use config::execute as config;
pub use configure::execute as configure;
pub use download::execute as download;
pub use lookup::execute as lookup;
pub use manifest::execute as manifest;
