use crate::error::VantageError;
use crate::model::Account;
use crate::storage::{AccountStore, DataLayout};

/// Registers a client and creates its experiments, results and logs directories.
///
/// If the directories can not be created the account is removed again, so the
/// name stays free for a retry. Used by `POST /register` and by the `add-user`
/// subcommand.
pub fn register(
    accounts: &AccountStore,
    layout: &DataLayout,
    username: &str,
    password: &str,
) -> Result<Account, VantageError> {
    let account = accounts.register(username, password)?;
    if let Err(err) = layout.client_space(&account).create_dirs() {
        log::error!("could not create directories for {}: {}", username, err);
        if let Err(rollback_err) = accounts.remove(username) {
            log::error!("could not roll back account {}: {}", username, rollback_err);
        }
        return Err(err);
    }
    Ok(account)
}
