pub mod context;
pub mod login;
pub mod password;
pub mod profile;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use calcdesk_bff::ProfileController;
use calcdesk_client::HttpProfileApi;
use calcdesk_core::ProfileError;
use calcdesk_flux::StateStore;

use crate::config::{ClientConfig, ContextStorage};
use crate::render;

/// Build a controller bound to the current context, with the terminal
/// renderer attached to its store.
pub fn connect(client_config_path: &Path) -> Result<ProfileController> {
    let config = ClientConfig::load(client_config_path)?;

    let ctx = config
        .current()
        .ok_or_else(|| anyhow::anyhow!("No current context. Run `calcdesk use context <name>`."))?;

    if ctx.server.is_empty() {
        anyhow::bail!(
            "No server URL set for context \"{}\". Run `calcdesk context set {} --server <url>`.",
            ctx.name,
            ctx.name
        );
    }

    tracing::debug!(context = %ctx.name, server = %ctx.server, "connecting");

    let store = Arc::new(StateStore::new());
    render::attach(&store);

    Ok(ProfileController::new(
        Arc::new(HttpProfileApi::new(ctx.server.clone())),
        Arc::new(ContextStorage::new(client_config_path, ctx.name.clone())),
        store,
        config.profile.clone(),
    ))
}

/// Turn a handler failure into the CLI's exit error. The renderer has
/// already shown any alert.
pub fn finish<T>(result: Result<T, ProfileError>) -> Result<T> {
    match result {
        Ok(v) => Ok(v),
        Err(ProfileError::AuthExpired) => anyhow::bail!("Not logged in."),
        Err(e) => Err(e.into()),
    }
}
