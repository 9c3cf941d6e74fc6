//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{RegistryError, RegistryResult};
use crate::ui;
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "registry.registry_path",
    "registry.workspace",
    "registry.dev_tag",
    "registry.timeout_secs",
    "registry.p4_program",
    "registry.cache_dir",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    config: &Config,
) -> RegistryResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> RegistryResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> RegistryResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(&format!("Configuration initialized at {}", path.display()));

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> RegistryResult<()> {
    let mut config = config.clone();
    apply(&mut config, key, value)?;
    manager.save(&config).await?;
    ui::step_ok(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Apply one dot-separated key to a config
fn apply(config: &mut Config, key: &str, value: &str) -> RegistryResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(RegistryError::ConfigValue {
                    key: "general.log_format",
                    reason: format!("'{}' is not text or json", value),
                })
            }
        },

        ["registry", "registry_path"] => config.registry.registry_path = PathBuf::from(value),
        ["registry", "workspace"] => config.registry.workspace = value.to_string(),
        ["registry", "dev_tag"] => {
            crate::registry::validate_version(value)?;
            config.registry.dev_tag = value.to_string();
        }
        ["registry", "timeout_secs"] => config.registry.timeout_secs = parse_secs(value)?,
        ["registry", "p4_program"] => config.registry.p4_program = value.to_string(),
        ["registry", "cache_dir"] => {
            config.registry.cache_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }

        _ => {
            return Err(RegistryError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn parse_secs(value: &str) -> RegistryResult<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RegistryError::ConfigValue {
            key: "registry.timeout_secs",
            reason: format!("'{}' is not a positive number of seconds", value),
        }),
    }
}
