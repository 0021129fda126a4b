use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// One write lock per account.
///
/// Writes into an account's subtree take that account's lock, so two uploads
/// from the same client never interleave while different clients proceed in
/// parallel.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> AccountLocks {
        AccountLocks::default()
    }

    pub fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
