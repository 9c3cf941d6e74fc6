//! Interactive collection of registry settings

use crate::config::{RegistryConfig, DEFAULT_DEV_TAG};
use crate::error::RegistryResult;
use crate::registry::package::validate_version;
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Prompt for registry path, client name and development tag
///
/// Existing values are offered as defaults. Without a terminal the
/// configuration is only validated.
pub async fn configure(mut config: RegistryConfig, ctx: &UiContext) -> RegistryResult<RegistryConfig> {
    let registry_path = ui::input(
        ctx,
        "p4 local registry path",
        &config.registry_path.to_string_lossy(),
    )
    .await?;
    config.registry_path = PathBuf::from(registry_path);

    config.workspace = ui::input(
        ctx,
        "p4 local registry client name (P4CLIENT)",
        &config.workspace,
    )
    .await?;

    let dev_default = if config.dev_tag.is_empty() {
        DEFAULT_DEV_TAG.to_string()
    } else {
        config.dev_tag.clone()
    };
    config.dev_tag = ui::input(
        ctx,
        "Version name that always points at the latest change",
        &dev_default,
    )
    .await?;

    config.validate()?;
    validate_version(&config.dev_tag)?;
    Ok(config)
}
