//! Versioned JSON envelope

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: FORMAT_VERSION,
            payload,
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `payload` wrapped in an envelope; the old file is replaced atomically
pub fn save_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(&Envelope::new(payload))?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read an envelope; `Ok(None)` when nothing has been saved yet
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let envelope: Envelope<T> = serde_json::from_str(&json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(Some(envelope.payload))
}
