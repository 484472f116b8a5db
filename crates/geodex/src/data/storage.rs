//! Storage layer for JSON persistence
//!
//! Records are JSON documents addressed by key. `FileStorage` keeps one
//! file per key, `MemoryStorage` keeps them in a map.

use crate::config::app::NAME;
use crate::error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Keyed durable storage for serialized records
///
/// Records are only ever replaced whole, never deleted.
pub trait Storage: Send + Sync {
    /// Read the raw record stored under `key`, `None` if absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the record stored under `key`
    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// Get the application config directory path
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(NAME))
        .ok_or_else(|| AppError::Config(
            "Could not determine config directory. HOME environment variable may not be set.".to_string()
        ))
}

/// Load and deserialize the record under `key`
///
/// Missing and blank records both load as `None`.
pub fn load_record<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    let content = match storage.read(key)? {
        Some(c) => c,
        None => return Ok(None),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let data = serde_json::from_str(&content).map_err(|e| {
        AppError::Storage(format!("Failed to parse record '{}': {}", key, e))
    })?;

    Ok(Some(data))
}

/// Serialize and store a record under `key`
pub fn save_record<T: Serialize>(storage: &dyn Storage, key: &str, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data).map_err(|e| {
        AppError::Storage(format!("Failed to serialize record '{}': {}", key, e))
    })?;

    storage.write(key, &content)?;
    debug!(key, bytes = content.len(), "record saved");
    Ok(())
}

// =============================================================================
// FileStorage
// =============================================================================

/// One pretty-printed JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at a specific directory (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage rooted at the default config directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config_dir()?))
    }

    /// Directory holding the record files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a given key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        read_file(&self.path_for(key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        create_dir_if_needed(&self.dir)?;
        write_file(&self.path_for(key), contents)
    }
}

/// Create a directory if it doesn't exist, with proper error handling
fn create_dir_if_needed(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot create directory {:?}", path)
                }
                _ => format!("Failed to create directory {:?}: {}", path, e),
            };
            Err(AppError::Storage(msg))
        }
    }
}

fn read_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            ErrorKind::PermissionDenied => Err(AppError::Storage(format!(
                "Permission denied: cannot read {:?}",
                path
            ))),
            _ => Err(AppError::Storage(format!("Failed to read {:?}: {}", path, e))),
        },
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    match fs::write(path, content) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot write to {:?}", path)
                }
                ErrorKind::ReadOnlyFilesystem => {
                    format!("Cannot write to {:?}: filesystem is read-only", path)
                }
                _ => format!("Failed to write to {:?}: {}", path, e),
            };
            Err(AppError::Storage(msg))
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage, mainly for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record text, if present
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), contents.to_string());
        Ok(())
    }
}
