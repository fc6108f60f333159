//! Durable and in-process slots for the bearer token.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The name of the credential slot.
pub const TOKEN_KEY: &str = "udata_token";

/// A single slot holding the current bearer token.
///
/// Implementations never fail: an unusable slot is logged and read as empty.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, if any.
    fn get(&self) -> Option<String>;

    /// Replaces the stored token.
    fn set(&self, token: &str);

    /// Empties the slot.
    fn clear(&self);
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A token slot that lives as long as the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.clone().and_then(non_blank)
    }

    fn set(&self, token: &str) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.to_string());
    }

    fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

/// A token slot persisted as a file named [`TOKEN_KEY`] in a data directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store rooted at `data_dir`. Nothing is touched on disk until
    /// the first `set`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// The file backing this slot.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => non_blank(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("⚠️ Credential slot {} unreadable: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!("⚠️ Could not create {}: {}", dir.display(), e);
                return;
            }
        }

        if let Err(e) = fs::write(&self.path, token) {
            tracing::warn!("⚠️ Credential slot {} unwritable: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("⚠️ Could not clear {}: {}", self.path.display(), e);
            }
        }
    }
}
