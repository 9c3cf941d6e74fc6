//! Interactive prompts with a non-interactive fallback

use super::context::UiContext;
use crate::error::{RegistryError, RegistryResult};

/// Ask for a text value, returning `default` when prompts are unavailable
///
/// An empty answer keeps the default.
pub async fn input(ctx: &UiContext, message: &str, default: &str) -> RegistryResult<String> {
    if !ctx.is_interactive() {
        return Ok(default.to_string());
    }

    // cliclack blocks on the terminal
    let message = message.to_string();
    let initial = default.to_string();
    let result = tokio::task::spawn_blocking(move || {
        let mut prompt = cliclack::input(&message).required(false);
        if !initial.is_empty() {
            prompt = prompt.default_input(&initial);
        }
        prompt.interact::<String>()
    })
    .await
    .map_err(|e| RegistryError::User(format!("Prompt task failed: {}", e)))?;

    let answer = result.map_err(|e| RegistryError::User(format!("Prompt failed: {}", e)))?;
    if answer.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.trim().to_string())
    }
}

/// Ask a yes/no question, returning `default` when prompts are unavailable
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> RegistryResult<bool> {
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| RegistryError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| RegistryError::User(format!("Prompt failed: {}", e)))
}
