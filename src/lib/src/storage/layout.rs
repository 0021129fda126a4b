//! On-disk layout of the home directory
//!
//! ```text
//! <home>/
//!     accounts.json
//!     config.toml           (optional)
//!     .staging/             (partial uploads, never listed)
//!     experiments/<username>/...
//!     results/<username>/...
//!     logs/<username>/...
//! ```
//!
//! Request handlers never build paths themselves. They ask the layout for a
//! [`ClientSpace`], a handle scoped to one account's three subdirectories, and
//! every file name is checked by [`validate_file_name`] before it touches disk.
//! Names are stored exactly as the client sent them or rejected, never rewritten,
//! so two distinct names can not end up in the same file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::constants::{
    ACCOUNTS_FILENAME, EXPERIMENTS_DIR, LOGS_DIR, MAX_FILENAME_BYTES, RESULTS_DIR, STAGING_DIR,
};
use crate::error::VantageError;
use crate::model::Account;
use crate::storage::AccountLocks;
use crate::util;

#[derive(Debug, Clone)]
pub struct DataLayout {
    home: PathBuf,
    locks: Arc<AccountLocks>,
}

impl DataLayout {
    pub fn new(home: impl AsRef<Path>) -> DataLayout {
        DataLayout {
            home: home.as_ref().to_path_buf(),
            locks: Arc::new(AccountLocks::new()),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn experiments_dir(&self) -> PathBuf {
        self.home.join(EXPERIMENTS_DIR)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.home.join(RESULTS_DIR)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.home.join(LOGS_DIR)
    }

    /// Scratch space for uploads in flight, renamed into place once complete
    pub fn staging_dir(&self) -> PathBuf {
        self.home.join(STAGING_DIR)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.home.join(ACCOUNTS_FILENAME)
    }

    /// Creates the home directory and its top level subdirectories
    pub fn init(&self) -> Result<(), VantageError> {
        for dir in [
            self.home.clone(),
            self.experiments_dir(),
            self.results_dir(),
            self.logs_dir(),
            self.staging_dir(),
        ] {
            util::fs::create_dir_all(dir)?;
        }
        log::debug!("initialized data layout at {:?}", self.home);
        Ok(())
    }

    pub fn client_space(&self, account: &Account) -> ClientSpace {
        let username = account.username.as_str();
        ClientSpace {
            username: username.to_string(),
            experiments: self.experiments_dir().join(username),
            results: self.results_dir().join(username),
            logs: self.logs_dir().join(username),
            staging: self.staging_dir(),
            lock: self.locks.lock_for(username),
        }
    }
}

/// Storage handle scoped to a single account.
///
/// Every path it hands out is a direct child of that account's directories.
#[derive(Debug, Clone)]
pub struct ClientSpace {
    username: String,
    experiments: PathBuf,
    results: PathBuf,
    logs: PathBuf,
    staging: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ClientSpace {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn experiments_dir(&self) -> &Path {
        &self.experiments
    }

    pub fn results_dir(&self) -> &Path {
        &self.results
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs
    }

    pub fn create_dirs(&self) -> Result<(), VantageError> {
        util::fs::create_dir_all(&self.experiments)?;
        util::fs::create_dir_all(&self.results)?;
        util::fs::create_dir_all(&self.logs)?;
        Ok(())
    }

    /// Stores a result file, replacing any earlier upload with the same name.
    /// Returns the path written.
    pub fn store_result(&self, filename: &str, data: &[u8]) -> Result<PathBuf, VantageError> {
        self.store(&self.results, filename, data)
    }

    pub fn store_log(&self, filename: &str, data: &[u8]) -> Result<PathBuf, VantageError> {
        self.store(&self.logs, filename, data)
    }

    pub fn list_results(&self) -> Result<Vec<String>, VantageError> {
        util::fs::list_file_names(&self.results)
    }

    pub fn list_experiments(&self) -> Result<Vec<String>, VantageError> {
        util::fs::list_file_names(&self.experiments)
    }

    /// Path of an assigned experiment file, or NotFound
    pub fn experiment_path(&self, name: &str) -> Result<PathBuf, VantageError> {
        let path = validate_file_name(name)
            .map(|name| self.experiments.join(name))
            .map_err(|_| VantageError::not_found(format!("experiment {name}")))?;
        if !path.is_file() {
            return Err(VantageError::not_found(format!("experiment {name}")));
        }
        Ok(path)
    }

    fn store(&self, dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf, VantageError> {
        let path = dir.join(validate_file_name(filename)?);

        let _guard = self.lock.lock();
        util::fs::create_dir_all(dir)?;
        util::fs::create_dir_all(&self.staging)?;
        util::fs::write_atomic_in(&self.staging, &path, data)?;
        log::debug!(
            "{} stored {} bytes at {:?}",
            self.username,
            data.len(),
            path
        );
        Ok(path)
    }
}

/// Checks that a client supplied file name is a single path component.
///
/// Returns the name unchanged. Anything that could leave the directory it is
/// joined to, or that the filesystem can not store, is a bad request.
fn validate_file_name(name: &str) -> Result<&str, VantageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.len() > MAX_FILENAME_BYTES
        || name.chars().any(|c| c == '/' || c.is_control());
    if invalid {
        return Err(VantageError::bad_request(format!(
            "invalid file name: {name:?}"
        )));
    }
    Ok(name)
}
