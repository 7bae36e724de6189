//! File-backed registry of exchange accounts.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::cipher::SecretCipher;
use crate::errors::StoreError;
use crate::storage;
use crate::Result;

use super::accounts_model::{Account, AccountSummary, NewAccount};

/// Durable account registry backed by a single JSON document.
///
/// Secrets are encrypted before they reach the document; the document is
/// rewritten wholesale under an internal lock on every mutation.
pub struct AccountStore {
    path: PathBuf,
    cipher: Arc<SecretCipher>,
    lock: Mutex<()>,
}

impl AccountStore {
    pub fn new(path: PathBuf, cipher: Arc<SecretCipher>) -> Self {
        Self {
            path,
            cipher,
            lock: Mutex::new(()),
        }
    }

    /// Lists all accounts with secrets redacted.
    pub fn list(&self) -> Result<Vec<AccountSummary>> {
        Ok(self.all()?.iter().map(AccountSummary::from).collect())
    }

    /// Returns the full account records, cipher fields included.
    ///
    /// Reserved for the sync path; [`list`](Self::list) is the only view
    /// that leaves the process.
    pub fn all(&self) -> Result<Vec<Account>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        self.load_locked()
    }

    /// Validates, encrypts, and persists a new account, returning the
    /// stored record.
    pub fn add(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let api_secret_cipher = new_account
            .api_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| self.cipher.encrypt(s))
            .transpose()?;
        let passphrase_cipher = new_account
            .passphrase
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| self.cipher.encrypt(s))
            .transpose()?;

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: new_account.name.trim().to_string(),
            exchange: new_account.exchange.trim().to_lowercase(),
            api_key: new_account.api_key.trim().to_string(),
            api_secret_cipher,
            passphrase_cipher,
            created_at: Utc::now(),
        };

        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut accounts = self.load_locked()?;
        accounts.push(account.clone());
        self.persist_locked(&accounts)?;
        debug!(
            "[Accounts] Registered {} account '{}'",
            account.exchange, account.name
        );
        Ok(account)
    }

    /// Removes an account by id. Removing an unknown id is a successful
    /// no-op.
    pub fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut accounts = self.load_locked()?;
        accounts.retain(|account| account.id != id);
        self.persist_locked(&accounts)
    }

    fn load_locked(&self) -> Result<Vec<Account>> {
        storage::load_or_default(&self.path, Vec::new)
    }

    fn persist_locked(&self, accounts: &[Account]) -> Result<()> {
        storage::persist(&self.path, &accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn store_at(path: PathBuf) -> AccountStore {
        AccountStore::new(path, Arc::new(SecretCipher::new("test-server-secret")))
    }

    fn new_account(name: &str, exchange: &str) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            exchange: exchange.to_string(),
            api_key: "K1".to_string(),
            api_secret: Some("S1-super-secret".to_string()),
            passphrase: Some("P1-passphrase".to_string()),
        }
    }

    #[test]
    fn add_persists_encrypted_secrets_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let store = store_at(path.clone());

        let account = store.add(new_account("Main", "Binance")).unwrap();
        assert_eq!(account.exchange, "binance");
        assert!(account.api_secret_cipher.is_some());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("apiSecretCipher"));
        assert!(raw.contains("passphraseCipher"));
        assert!(!raw.contains("S1-super-secret"));
        assert!(!raw.contains("P1-passphrase"));
    }

    #[test]
    fn list_redacts_secret_material() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path().join("accounts.json"));
        store.add(new_account("Main", "binance")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains("apiSecret"));
        assert!(!json.contains("passphrase"));
        assert!(!json.contains("apiKey"));
    }

    #[test]
    fn add_rejects_incomplete_input() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path().join("accounts.json"));

        let mut input = new_account("Main", "binance");
        input.api_key.clear();
        assert!(matches!(
            store.add(input).unwrap_err(),
            crate::Error::Validation(_)
        ));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path().join("accounts.json"));
        let keep = store.add(new_account("Keep", "binance")).unwrap();
        let gone = store.add(new_account("Gone", "kraken")).unwrap();

        store.remove(&gone.id).unwrap();
        store.remove(&gone.id).unwrap();
        store.remove("never-existed").unwrap();

        let remaining = store.all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn accounts_survive_reopen_and_decrypt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let cipher = Arc::new(SecretCipher::new("test-server-secret"));

        let added = AccountStore::new(path.clone(), cipher.clone())
            .add(new_account("Main", "binance"))
            .unwrap();

        let reopened = AccountStore::new(path, cipher.clone());
        let accounts = reopened.all().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, added.id);

        let secret = cipher
            .decrypt(accounts[0].api_secret_cipher.as_deref().unwrap())
            .unwrap();
        assert_eq!(secret, "S1-super-secret");
    }

    #[test]
    fn optional_secrets_stay_absent() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path().join("accounts.json"));

        let account = store
            .add(NewAccount {
                name: "ReadOnly".to_string(),
                exchange: "binance".to_string(),
                api_key: "K2".to_string(),
                api_secret: None,
                passphrase: Some(String::new()),
            })
            .unwrap();

        assert!(account.api_secret_cipher.is_none());
        assert!(account.passphrase_cipher.is_none());
    }
}
