//! Filesystem helpers

use std::io::Write;
use std::path::Path;

use crate::error::VantageError;

/// Prefix of the scratch files [`write_atomic`] creates before renaming
const TMP_PREFIX: &str = ".tmp-";

pub fn create_dir_all(path: impl AsRef<Path>) -> Result<(), VantageError> {
    let path = path.as_ref();
    match std::fs::create_dir_all(path) {
        Ok(_) => Ok(()),
        Err(err) => {
            log::error!("create_dir_all {:?} failed: {}", path, err);
            Err(VantageError::Io(err))
        }
    }
}

/// Writes `data` to `path` so readers only ever see the old or the new content.
///
/// The bytes go to a temp file in the same directory, which is then renamed over
/// the destination.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<(), VantageError> {
    let path = path.as_ref();
    let parent = path
        .parent()
        .ok_or_else(|| VantageError::basic_str(format!("no parent directory for {path:?}")))?;
    write_atomic_in(parent, path, data)
}

/// Like [`write_atomic`], with the temp file created in `staging` instead of
/// next to the destination. `staging` must be on the same filesystem as `path`.
pub fn write_atomic_in(
    staging: impl AsRef<Path>,
    path: impl AsRef<Path>,
    data: &[u8],
) -> Result<(), VantageError> {
    let path = path.as_ref();
    let mut tmp = tempfile::Builder::new()
        .prefix(TMP_PREFIX)
        .tempfile_in(staging)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| {
        log::error!("could not persist {:?}: {}", path, err.error);
        VantageError::Io(err.error)
    })?;
    Ok(())
}

/// Sorted names of the regular files directly inside `dir`.
///
/// A missing directory lists as empty.
pub fn list_file_names(dir: impl AsRef<Path>) -> Result<Vec<String>, VantageError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut names = vec![];
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}
