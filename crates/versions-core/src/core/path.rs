use crate::core::error::{VersionsError, VersionsResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "versions.yaml";

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> VersionsResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve_relative(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Directory that relative paths in a config file are resolved against
pub fn config_root(config_path: &Path) -> PathBuf {
    parent_dir(config_path)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// New contents written beside their target, not yet visible there
pub struct StagedWrite {
    tmp: tempfile::NamedTempFile,
    target: PathBuf,
}

impl StagedWrite {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged file over its target
    pub fn commit(self) -> VersionsResult<()> {
        let target = self.target;
        self.tmp.persist(&target).map_err(|e| {
            VersionsError::Path(format!("Failed to replace {}: {}", target.display(), e.error))
        })?;
        Ok(())
    }
}

/// Write `contents` to a temp file in the directory of `path`.
///
/// Committing renames it over the target, so readers never observe a
/// partial file. Dropping the result without committing removes it.
pub fn stage_write(path: &Path, contents: &str) -> VersionsResult<StagedWrite> {
    let dir = parent_dir(path);
    ensure_dir(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
        VersionsError::Path(format!(
            "Failed to create temp file in {}: {}",
            dir.display(),
            e
        ))
    })?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;

    Ok(StagedWrite {
        tmp,
        target: path.to_path_buf(),
    })
}
