//! Manifest command - print the manifest of a package version

use crate::cli::args::ManifestArgs;
use crate::config::Config;
use crate::error::RegistryResult;
use crate::registry::{P4Registry, RegistryProvider};

/// Execute the manifest command
pub async fn execute(args: ManifestArgs, config: &Config) -> RegistryResult<()> {
    let registry = P4Registry::new(config.registry.clone())?;
    let manifest = registry
        .get_package_config(&args.package, &args.version, None, None)
        .await?;

    println!("{}", serde_json::to_string_pretty(manifest.as_value())?);
    Ok(())
}
