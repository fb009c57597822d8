//! Login / logout commands.

use std::path::Path;

use anyhow::Result;

use super::{connect, finish};
use crate::config::ClientConfig;

/// Login to the current context's server and store the token there.
pub async fn login(email: &str, password: &str, client_config_path: &Path) -> Result<()> {
    let controller = connect(client_config_path)?;
    finish(controller.login(email, password).await)?;

    let config = ClientConfig::load(client_config_path)?;
    println!("Logged in as {}.", email.trim());
    println!("Token saved to context \"{}\".", config.current_context);
    Ok(())
}

/// Logout: clear token from current context.
pub fn logout(client_config_path: &Path) -> Result<()> {
    let controller = connect(client_config_path)?;
    finish(controller.logout())?;
    Ok(())
}
