//! Profile commands.

use std::path::Path;

use anyhow::Result;

use super::{connect, finish};
use crate::render;

pub async fn show(client_config_path: &Path) -> Result<()> {
    let controller = connect(client_config_path)?;
    finish(controller.open().await)?;
    render::profile(controller.store());
    Ok(())
}

/// Update email and bio, then show the reloaded profile.
pub async fn update(email: &str, bio: Option<&str>, client_config_path: &Path) -> Result<()> {
    let controller = connect(client_config_path)?;
    finish(controller.open().await)?;

    // An omitted --bio keeps the current one, as the pre-filled form would.
    let bio = match bio {
        Some(b) => b.to_string(),
        None => controller
            .store()
            .get_as::<calcdesk_bff::ProfileFormState>(calcdesk_bff::ProfileFormState::PATH)
            .map(|f| f.bio)
            .unwrap_or_default(),
    };

    finish(controller.update_profile(email, &bio).await)?;
    render::profile(controller.store());
    Ok(())
}
