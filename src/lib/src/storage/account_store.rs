//! Registered accounts, kept in memory and mirrored to `accounts.json`
//!
//! The server and the `add-user` subcommand may write the same file. Writers
//! hold an exclusive lock on `accounts.lock`, re-read the file, and only then
//! apply their change, so neither process drops accounts the other added.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::constants::ACCOUNTS_LOCK_FILENAME;
use crate::error::VantageError;
use crate::model::Account;
use crate::util;

#[derive(Debug)]
pub struct AccountStore {
    path: PathBuf,
    lock_path: PathBuf,
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountStore {
    /// Loads the accounts file at `path`, or starts empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<AccountStore, VantageError> {
        let path = path.as_ref().to_path_buf();
        let lock_path = path.with_file_name(ACCOUNTS_LOCK_FILENAME);
        let accounts: HashMap<String, Account> = read_accounts(&path)?
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();
        log::debug!("loaded {} accounts from {:?}", accounts.len(), path);

        Ok(AccountStore {
            path,
            lock_path,
            accounts: RwLock::new(accounts),
        })
    }

    /// Creates a new account. Fails with [`VantageError::UsernameTaken`] if the
    /// name is in use; the store is unchanged when persisting fails.
    pub fn register(&self, username: &str, password: &str) -> Result<Account, VantageError> {
        let account = Account::new(username, password)?;

        let mut file_lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let _file_guard = file_lock.write()?;
        let mut accounts = self.accounts.write();
        self.merge_from_disk(&mut accounts)?;

        if accounts.contains_key(username) {
            return Err(VantageError::UsernameTaken(username.to_string()));
        }
        accounts.insert(account.username.clone(), account.clone());

        if let Err(err) = self.persist(&accounts) {
            accounts.remove(username);
            return Err(err);
        }

        log::info!("registered account {}", username);
        Ok(account)
    }

    /// Deletes an account. Removing an unknown name is not an error.
    pub fn remove(&self, username: &str) -> Result<(), VantageError> {
        let mut file_lock = fd_lock::RwLock::new(self.open_lock_file()?);
        let _file_guard = file_lock.write()?;
        let mut accounts = self.accounts.write();
        self.merge_from_disk(&mut accounts)?;

        if let Some(account) = accounts.remove(username) {
            if let Err(err) = self.persist(&accounts) {
                accounts.insert(account.username.clone(), account);
                return Err(err);
            }
            log::info!("removed account {}", username);
        }
        Ok(())
    }

    /// Returns the account if the credentials match.
    ///
    /// Names not known in memory are looked up again on disk, which picks up
    /// accounts added by another process.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Account, VantageError> {
        let known = self.accounts.read().contains_key(username);
        if !known {
            let mut accounts = self.accounts.write();
            self.merge_from_disk(&mut accounts)?;
        }

        let accounts = self.accounts.read();
        match accounts.get(username) {
            Some(account) if account.verify_password(password) => Ok(account.clone()),
            Some(_) => {
                log::debug!("wrong password for {}", username);
                Err(VantageError::Unauthorized)
            }
            None => {
                log::debug!("unknown account {}", username);
                Err(VantageError::Unauthorized)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn open_lock_file(&self) -> Result<File, VantageError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        Ok(file)
    }

    /// Adds accounts present on disk but missing from memory
    fn merge_from_disk(&self, accounts: &mut HashMap<String, Account>) -> Result<(), VantageError> {
        for account in read_accounts(&self.path)? {
            if !accounts.contains_key(&account.username) {
                log::debug!("picked up account {} from {:?}", account.username, self.path);
                accounts.insert(account.username.clone(), account);
            }
        }
        Ok(())
    }

    fn persist(&self, accounts: &HashMap<String, Account>) -> Result<(), VantageError> {
        let mut records: Vec<&Account> = accounts.values().collect();
        records.sort_by(|a, b| a.username.cmp(&b.username));
        let json = serde_json::to_vec_pretty(&records)?;
        util::fs::write_atomic(&self.path, &json)
    }
}

fn read_accounts(path: &Path) -> Result<Vec<Account>, VantageError> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ACCOUNTS_FILENAME;

    #[test]
    fn test_register_then_authenticate() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join(ACCOUNTS_FILENAME)).unwrap();
        assert!(store.is_empty());

        store.register("testy", "testy").unwrap();
        let account = store.authenticate("testy", "testy").unwrap();
        assert_eq!(account.username, "testy");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_authenticate_rejects_bad_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join(ACCOUNTS_FILENAME)).unwrap();
        store.register("testy", "testy").unwrap();

        assert!(matches!(
            store.authenticate("testy", "wrong"),
            Err(VantageError::Unauthorized)
        ));
        assert!(matches!(
            store.authenticate("nobody", "testy"),
            Err(VantageError::Unauthorized)
        ));
    }

    #[test]
    fn test_duplicate_username_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join(ACCOUNTS_FILENAME)).unwrap();
        store.register("testy", "first").unwrap();

        let result = store.register("testy", "second");
        assert!(matches!(result, Err(VantageError::UsernameTaken(_))));

        // The first password still works
        assert!(store.authenticate("testy", "first").is_ok());
        assert!(store.authenticate("testy", "second").is_err());
    }

    #[test]
    fn test_accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACCOUNTS_FILENAME);
        {
            let store = AccountStore::open(&path).unwrap();
            store.register("alice", "a-pass").unwrap();
            store.register("bob", "b-pass").unwrap();
        }

        let store = AccountStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.authenticate("alice", "a-pass").is_ok());
        assert!(store.authenticate("bob", "b-pass").is_ok());
    }

    #[test]
    fn test_failed_persist_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join("missing").join(ACCOUNTS_FILENAME)).unwrap();

        assert!(store.register("testy", "testy").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_username_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::open(dir.path().join(ACCOUNTS_FILENAME)).unwrap();

        let result = store.register("../escape", "pw");
        assert!(matches!(result, Err(VantageError::BadRequest(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_second_writer_keeps_accounts_of_the_first() {
        // A running server and an `add-user` run share the same file
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACCOUNTS_FILENAME);
        let server = AccountStore::open(&path).unwrap();
        let cli = AccountStore::open(&path).unwrap();

        cli.register("from-cli", "cli-pass").unwrap();
        server.register("from-http", "http-pass").unwrap();

        // The server sees the account it never registered itself
        assert!(server.authenticate("from-cli", "cli-pass").is_ok());

        let reopened = AccountStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert!(reopened.authenticate("from-cli", "cli-pass").is_ok());
        assert!(reopened.authenticate("from-http", "http-pass").is_ok());
    }

    #[test]
    fn test_duplicate_across_writers_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACCOUNTS_FILENAME);
        let server = AccountStore::open(&path).unwrap();
        let cli = AccountStore::open(&path).unwrap();

        cli.register("testy", "first").unwrap();
        let result = server.register("testy", "second");
        assert!(matches!(result, Err(VantageError::UsernameTaken(_))));
    }

    #[test]
    fn test_remove_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ACCOUNTS_FILENAME);
        let store = AccountStore::open(&path).unwrap();
        store.register("testy", "testy").unwrap();

        store.remove("testy").unwrap();
        assert!(store.is_empty());
        assert!(store.authenticate("testy", "testy").is_err());
        assert!(AccountStore::open(&path).unwrap().is_empty());

        // Name is free again
        store.register("testy", "testy").unwrap();
        store.remove("nobody").unwrap();
        assert_eq!(store.len(), 1);
    }
}
