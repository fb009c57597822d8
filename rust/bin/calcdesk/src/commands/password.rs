//! Password commands.

use std::path::Path;

use anyhow::Result;
use calcdesk_core::{PasswordChange, strength};

use super::{connect, finish};

/// Prompt for current/new/confirm and change the password. The session is
/// ended afterwards.
pub async fn passwd(client_config_path: &Path) -> Result<()> {
    let controller = connect(client_config_path)?;
    // Fail on a missing session before prompting.
    finish(controller.require_session())?;

    let current_password = rpassword::prompt_password("Current password: ")?;
    let new_password = rpassword::prompt_password("New password: ")?;
    if let Some(level) = controller.password_input(&new_password) {
        eprintln!("Strength: {}", level);
    }
    let confirm_password = rpassword::prompt_password("Confirm new password: ")?;

    finish(
        controller
            .change_password(PasswordChange {
                current_password,
                new_password,
                confirm_password,
            })
            .await,
    )
}

/// Print the strength level of a candidate password.
pub fn check_strength(password: &str) -> Result<()> {
    match strength::indicator(password) {
        Some(level) => println!("{} ({}/{})", level, strength::score(password), strength::MAX_SCORE),
        None => anyhow::bail!("Password is empty."),
    }
    Ok(())
}
