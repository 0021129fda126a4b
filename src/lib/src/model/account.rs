use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::MAX_USERNAME_LEN;
use crate::error::VantageError;

const SALT_LEN: usize = 16;

/// A registered measurement client.
///
/// Only a salted SHA-256 digest of the password is kept.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    pub username: String,
    salt: String,
    password_hash: String,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: &str, password: &str) -> Result<Account, VantageError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(VantageError::bad_request("password must not be empty"));
        }

        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let password_hash = hash_password(&salt, password);

        Ok(Account {
            username: username.to_string(),
            salt,
            password_hash,
            registered_at: Utc::now(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let candidate = hash_password(&self.salt, password);
        constant_time_eq(candidate.as_bytes(), self.password_hash.as_bytes())
    }
}

/// Usernames become directory names, so they are restricted to a portable set:
/// ASCII alphanumerics, `-`, `_` and `.`, not starting with a dot.
pub fn validate_username(username: &str) -> Result<(), VantageError> {
    if username.is_empty() {
        return Err(VantageError::bad_request("username must not be empty"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(VantageError::bad_request(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.starts_with('.') {
        return Err(VantageError::bad_request(
            "username must not start with '.'",
        ));
    }
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid {
        return Err(VantageError::bad_request(format!(
            "username contains invalid characters: {username}"
        )));
    }
    Ok(())
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password() {
        let account = Account::new("testy", "testy").unwrap();
        assert!(account.verify_password("testy"));
        assert!(!account.verify_password("Testy"));
        assert!(!account.verify_password(""));
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let account = Account::new("testy", "hunter2").unwrap();
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = Account::new("a", "secret").unwrap();
        let b = Account::new("b", "secret").unwrap();
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[test]
    fn test_account_survives_serialization() {
        let account = Account::new("testy", "testy").unwrap();
        let json = serde_json::to_string(&account).unwrap();
        let loaded: Account = serde_json::from_str(&json).unwrap();
        assert!(loaded.verify_password("testy"));
        assert_eq!(loaded.registered_at, account.registered_at);
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("testy").is_ok());
        assert!(validate_username("a1b2-c3_d4.e5").is_ok());
        assert!(validate_username(&"f".repeat(64)).is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username(".hidden").is_err());
        assert!(validate_username("..").is_err());
        assert!(validate_username("a/b").is_err());
        assert!(validate_username("a\\b").is_err());
        assert!(validate_username("spaced name").is_err());
        assert!(validate_username(&"f".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = Account::new("testy", "");
        assert!(matches!(result, Err(VantageError::BadRequest(_))));
    }
}
