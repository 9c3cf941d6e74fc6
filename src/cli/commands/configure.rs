//! Configure command - interactive registry setup

use crate::config::{Config, ConfigManager};
use crate::error::RegistryResult;
use crate::registry::P4Registry;
use crate::ui::{self, UiContext};

/// Execute the configure command
pub async fn execute(manager: &ConfigManager, config: &Config) -> RegistryResult<()> {
    let ctx = UiContext::detect();
    ui::intro("p4reg configure");

    let mut config = config.clone();
    config.registry = P4Registry::configure(config.registry, &ctx).await?;
    manager.save(&config).await?;

    ui::step_ok(&format!("Saved {}", manager.path().display()));
    ui::key_value("path", &config.registry.registry_path.display().to_string());
    ui::key_value("client", &config.registry.workspace);
    ui::key_value("dev tag", &config.registry.dev_tag);

    Ok(())
}
