//! Confirmation prompt with non-interactive fallback

use super::context::UiContext;
use crate::error::{MediError, MediResult};

/// Ask for confirmation
///
/// `--yes` approves; without a terminal the default is returned.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> MediResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| MediError::User(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| MediError::User(format!("Prompt failed: {}", e)))
}
