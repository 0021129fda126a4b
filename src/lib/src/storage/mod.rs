//! Persistence: registered accounts and the per-client directory tree

pub mod account_store;
pub mod layout;
pub mod locks;

pub use crate::storage::account_store::AccountStore;
pub use crate::storage::layout::{ClientSpace, DataLayout};
pub use crate::storage::locks::AccountLocks;
