//! Filesystem utilities for atomic writes of backing files.
//!
//! Readers (widget, reports) and writers (sync, export) run as separate
//! processes without locking, so every write goes to a sibling temp file
//! first and is renamed over the destination.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, VitalsError};

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// If the rename ultimately fails, the temp file is cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Write bytes to `destination` via a temp file in the same directory.
///
/// Parent directories are created as needed.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| VitalsError::io(parent, e))?;
        }
    }

    let temp_path = temp_path_for(destination);
    let mut file = fs::File::create(&temp_path).map_err(|e| VitalsError::io(&temp_path, e))?;
    if let Err(err) = file.write_all(contents).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(VitalsError::io(&temp_path, err));
    }
    drop(file);

    rename_with_fallback(&temp_path, destination).map_err(|e| VitalsError::io(destination, e))
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn write_json_atomic<T: Serialize + ?Sized>(destination: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_atomic(destination, &bytes)
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "data".to_string());
    destination.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.json");
        let dest = dir.path().join("dest.json");

        File::create(&temp).unwrap().write_all(b"[]").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]");
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.json");
        let dest = dir.path().join("dest.json");

        File::create(&dest).unwrap().write_all(b"old").unwrap();
        File::create(&temp).unwrap().write_all(b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_json_atomic_creates_parent_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested").join("daily_stats.json");

        write_json_atomic(&dest, &serde_json::json!([{"_date": "2025-01-01"}])).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(written[0]["_date"], "2025-01-01");

        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
