pub mod account;

pub use crate::model::account::Account;
