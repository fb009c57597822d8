//! Client-side context management.
//!
//! Reads/writes `~/.calcdesk/config.toml`.

use std::path::{Path, PathBuf};

use calcdesk_client::{SessionStorage, StorageError, TOKEN_KEY};
use calcdesk_core::ProfileSettings;
use serde::{Deserialize, Serialize};

/// A single context: connection to one calculator server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "local").
    pub name: String,

    /// Server URL (e.g. "http://localhost:8000").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Bearer token (set by `calcdesk login`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// List of configured contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Profile screen settings (login route, alert and logout timings).
    #[serde(default)]
    pub profile: ProfileSettings,
}

impl ClientConfig {
    /// Default config file path: ~/.calcdesk/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Session storage backed by one context's `token` field.
///
/// Every write goes straight to disk so the session survives between CLI
/// invocations. Only [`TOKEN_KEY`] is stored; other keys read as absent.
pub struct ContextStorage {
    path: PathBuf,
    context: String,
}

impl ContextStorage {
    pub fn new(path: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: context.into(),
        }
    }

    fn update(&self, token: String) -> Result<(), StorageError> {
        let mut config = ClientConfig::load(&self.path).map_err(storage_err)?;
        let ctx = config
            .get_mut(&self.context)
            .ok_or_else(|| StorageError(format!("context \"{}\" not found", self.context)))?;
        ctx.token = token;
        config.save(&self.path).map_err(storage_err)
    }
}

impl SessionStorage for ContextStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if key != TOKEN_KEY {
            return Ok(None);
        }
        let config = ClientConfig::load(&self.path).map_err(storage_err)?;
        Ok(config
            .contexts
            .into_iter()
            .find(|c| c.name == self.context)
            .map(|c| c.token)
            .filter(|t| !t.is_empty()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key != TOKEN_KEY {
            return Err(StorageError(format!("unsupported key: {}", key)));
        }
        self.update(value.to_string())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if key != TOKEN_KEY {
            return Ok(());
        }
        self.update(String::new())
    }
}

fn storage_err(e: anyhow::Error) -> StorageError {
    StorageError(format!("{:#}", e))
}

/// Return the calcdesk config directory (~/.calcdesk).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".calcdesk")
}
