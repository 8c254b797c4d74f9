use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read a file to a `String`. Returns `Ok(None)` if the file does not exist.
pub(crate) fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file at {}", path.display())),
    }
}

/// Deserialize a JSON file into type `T`. Returns `Ok(None)` if the file does not exist.
pub(crate) fn deserialize_if_exists<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(content) = read_if_exists(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&content)
        .map(Some)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Replace the contents of `path` without ever leaving a half-written file behind.
///
/// The data goes to `<path>.tmp`, is synced, and is then renamed over `path`.
pub(crate) fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        make_dir(parent)?;
    }

    let temp_path = sibling(path, "tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Unable to create {}", temp_path.display()))?;
    file.write_all(contents.as_ref())
        .with_context(|| format!("Unable to write to {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("Unable to sync {}", temp_path.display()))?;
    drop(file);

    if let Err(e) = rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

/// Basically move a file. Renames `from` -> `to`.
pub(crate) fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    std::fs::rename(from.as_ref(), to.as_ref()).with_context(|| {
        format!(
            "Unable to move file from '{}' to '{}'",
            from.as_ref().to_string_lossy(),
            to.as_ref().to_string_lossy()
        )
    })
}

pub(crate) fn make_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p)
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

/// `expenses.json` + `tmp` -> `expenses.json.tmp`
pub(crate) fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("expenses"));
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
