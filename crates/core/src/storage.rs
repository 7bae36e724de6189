//! Shared persistence helpers for the JSON document stores.
//!
//! Each store is a single JSON document rewritten wholesale on mutation.
//! Writes land in a sibling temp file, are fsynced, and atomically renamed
//! over the target, so a concurrent reader only ever observes a complete
//! document (old or new, never partial).

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Loads a JSON document, falling back to `default` when the file does not
/// exist yet or is empty.
pub fn load_or_default<T, F>(path: &Path, default: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    if !path.exists() {
        return Ok(default());
    }
    let raw = fs::read(path)?;
    if raw.is_empty() {
        return Ok(default());
    }
    Ok(serde_json::from_slice(&raw)?)
}

/// Serializes a document and atomically replaces the target file.
pub fn persist<T>(path: &Path, document: &T) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(document)?;

    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
