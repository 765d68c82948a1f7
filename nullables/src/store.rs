//! Nullable store: thread-safe in-memory storage for testing.

use sprout_store::{LedgerStore, StoreError};
use sprout_types::AccountId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// An in-memory ledger store for testing.
#[derive(Debug, Default)]
pub struct NullStore {
    accounts: Mutex<HashMap<AccountId, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of account records written so far.
    pub fn account_count(&self) -> usize {
        self.accounts.lock().map(|a| a.len()).unwrap_or(0)
    }
}

impl LedgerStore for NullStore {
    fn get_account(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(lock(&self.accounts)?.get(account).cloned())
    }

    fn put_account(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError> {
        lock(&self.accounts)?.insert(account.clone(), record.to_vec());
        Ok(())
    }

    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        let mut entries: Vec<_> = lock(&self.accounts)?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(lock(&self.meta)?.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        lock(&self.meta)?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
