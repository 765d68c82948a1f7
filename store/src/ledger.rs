use crate::StoreError;
use sprout_types::AccountId;

/// Store trait for persisting ledger state to durable storage.
///
/// Values are opaque `Vec<u8>` so backends stay independent of the record
/// encoding; the ledger serializes and deserializes its own types.
pub trait LedgerStore {
    fn get_account(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_account(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_accounts(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
