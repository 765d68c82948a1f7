//! Saving and restoring ledger state through a [`LedgerStore`].
//!
//! The persisted layout is one bincode-encoded [`AccountRecord`] per account
//! plus the global rate under the `global_rate` meta key. Capabilities and
//! allowances are not persisted; they come from configuration on load.

use sprout_rates::RateRegistry;
use sprout_store::LedgerStore;
use sprout_types::{AccountRecord, Rate, Timestamp};

use crate::auth::{Capability, CapabilityGate};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::Ledger;

const GLOBAL_RATE_KEY: &[u8] = b"global_rate";

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    bincode::serialize(value).map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LedgerError> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
}

impl Ledger {
    /// Persist account records and the global rate.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        store.put_meta(GLOBAL_RATE_KEY, &encode(&self.global_rate())?)?;
        for (account, record) in &self.accounts {
            store.put_account(account, &encode(record)?)?;
        }
        tracing::debug!(accounts = self.accounts.len(), "ledger saved");
        Ok(())
    }

    /// Restore a ledger from a store.
    ///
    /// The global rate falls back to the configured initial rate on a fresh
    /// store. Its history restarts at `now`. Capabilities are granted from
    /// `config`; observers must be subscribed again.
    pub fn load_from_store(
        store: &dyn LedgerStore,
        config: &LedgerConfig,
        now: Timestamp,
    ) -> Result<Self, LedgerError> {
        let global_rate = match store.get_meta(GLOBAL_RATE_KEY)? {
            Some(bytes) => decode::<Rate>(&bytes)?,
            None => config.initial_rate()?,
        };

        let mut gate = CapabilityGate::new(config.admin.clone());
        for minter in &config.minters {
            gate.grant(minter.clone(), Capability::MintAndBurn);
        }

        let mut ledger = Ledger::with_registry(gate, RateRegistry::new(global_rate, now));
        for (account, bytes) in store.iter_accounts()? {
            let record: AccountRecord = decode(&bytes)?;
            ledger.accounts.insert(account, record);
        }

        tracing::info!(
            accounts = ledger.accounts.len(),
            global_rate = %global_rate,
            "ledger restored"
        );
        Ok(ledger)
    }
}
