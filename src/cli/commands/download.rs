//! Download command - copy a package version into a directory

use crate::cli::args::DownloadArgs;
use crate::config::Config;
use crate::error::RegistryResult;
use crate::registry::{P4Registry, RegistryProvider};
use crate::ui;

/// Execute the download command
pub async fn execute(args: DownloadArgs, config: &Config) -> RegistryResult<()> {
    let registry = P4Registry::new(config.registry.clone())?;

    ui::intro(&format!("{}@{}", args.package, args.version));
    let manifest = registry
        .download(
            &args.package,
            &args.version,
            args.hash.as_deref(),
            None,
            &args.out,
        )
        .await?;

    ui::step_ok(&format!("Copied to {}", args.out.display()));
    if let Some(name) = manifest.name() {
        ui::key_value("name", name);
    }
    if let Some(version) = manifest.version() {
        ui::key_value("version", version);
    }

    Ok(())
}
