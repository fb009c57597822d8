//! Session context and the key-value storage it lives in.
//!
//! The token is owned by a [`SessionStorage`] under [`TOKEN_KEY`]. Callers
//! build a [`Session`] from storage and pass it explicitly to every API call;
//! nothing reads the token behind their back.

use std::collections::HashMap;
use std::sync::RwLock;

use calcdesk_core::ProfileError;

/// Fixed storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

impl From<StorageError> for ProfileError {
    fn from(e: StorageError) -> Self {
        ProfileError::Storage(e.0)
    }
}

/// Minimal key-value contract for persisting session data.
///
/// Implementations must be usable from `&self`; each call is one atomic
/// read or write.
pub trait SessionStorage: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Used by tests and by embedders that keep the session
/// only for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .items
            .write()
            .unwrap()
            .insert(TOKEN_KEY.to_string(), token.into());
        storage
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|e| StorageError(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|e| StorageError(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|e| StorageError(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}

/// An authenticated session: the bearer token for one user.
///
/// Created at login, destroyed at logout, on token rejection, and after a
/// password change.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Read the current session. An empty stored token counts as absent.
    pub fn load(storage: &dyn SessionStorage) -> Result<Option<Session>, StorageError> {
        Ok(storage
            .get_item(TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .map(Session::new))
    }

    /// Persist this session.
    pub fn save(&self, storage: &dyn SessionStorage) -> Result<(), StorageError> {
        storage.set_item(TOKEN_KEY, &self.token)
    }

    /// Destroy whatever session is stored.
    pub fn clear(storage: &dyn SessionStorage) -> Result<(), StorageError> {
        storage.remove_item(TOKEN_KEY)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}
