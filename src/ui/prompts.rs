//! Confirmation prompt with non-interactive fallback

use super::context::UiContext;
use crate::error::{RootEnvError, RootEnvResult};

/// Ask a yes/no question; `--yes` approves, scripted runs get `default`
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> RootEnvResult<bool> {
    if ctx.auto_yes() {
        println!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on the terminal
    let message = message.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| RootEnvError::Internal(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| RootEnvError::User(format!("Prompt failed: {}", e)))
}
