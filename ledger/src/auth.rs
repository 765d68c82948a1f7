//! Capability gate for privileged operations.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use sprout_types::AccountId;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A privilege an account can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Lower the global rate and manage other capabilities.
    Admin,
    /// Mint and burn ledger credits (held by the vault).
    MintAndBurn,
    /// Spend another account's balance. Never granted through the gate;
    /// conferred per owner by an allowance.
    Delegate,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Admin => write!(f, "admin capability"),
            Capability::MintAndBurn => write!(f, "mint-and-burn capability"),
            Capability::Delegate => write!(f, "an allowance from the owner"),
        }
    }
}

/// Which accounts hold which capabilities.
#[derive(Clone, Debug, Default)]
pub struct CapabilityGate {
    grants: HashMap<Capability, HashSet<AccountId>>,
}

impl CapabilityGate {
    /// A gate whose only holder is `admin`.
    pub fn new(admin: AccountId) -> Self {
        let mut gate = Self::default();
        gate.grant(admin, Capability::Admin);
        gate
    }

    pub fn holds(&self, account: &AccountId, capability: Capability) -> bool {
        self.grants
            .get(&capability)
            .is_some_and(|holders| holders.contains(account))
    }

    /// Fail with [`LedgerError::Unauthorized`] unless `caller` holds `capability`.
    pub fn require(&self, caller: &AccountId, capability: Capability) -> Result<(), LedgerError> {
        if self.holds(caller, capability) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, required = %capability, "privileged call rejected");
        Err(LedgerError::Unauthorized {
            caller: caller.clone(),
            required: capability,
        })
    }

    /// Returns `false` if the account already held it.
    pub fn grant(&mut self, account: AccountId, capability: Capability) -> bool {
        self.grants.entry(capability).or_default().insert(account)
    }

    /// Returns `false` if the account did not hold it.
    pub fn revoke(&mut self, account: &AccountId, capability: Capability) -> bool {
        self.grants
            .get_mut(&capability)
            .is_some_and(|holders| holders.remove(account))
    }

    pub fn holders(&self, capability: Capability) -> impl Iterator<Item = &AccountId> {
        self.grants.get(&capability).into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_admin_only() {
        let gate = CapabilityGate::new(AccountId::new("admin"));
        assert!(gate.holds(&AccountId::new("admin"), Capability::Admin));
        assert!(!gate.holds(&AccountId::new("admin"), Capability::MintAndBurn));
    }

    #[test]
    fn require_reports_missing_capability() {
        let gate = CapabilityGate::new(AccountId::new("admin"));
        match gate.require(&AccountId::new("mallory"), Capability::MintAndBurn) {
            Err(LedgerError::Unauthorized { caller, required }) => {
                assert_eq!(caller, AccountId::new("mallory"));
                assert_eq!(required, Capability::MintAndBurn);
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn grant_and_revoke() {
        let mut gate = CapabilityGate::new(AccountId::new("admin"));
        let vault = AccountId::new("vault");
        assert!(gate.grant(vault.clone(), Capability::MintAndBurn));
        assert!(!gate.grant(vault.clone(), Capability::MintAndBurn));
        assert!(gate.require(&vault, Capability::MintAndBurn).is_ok());
        assert_eq!(gate.holders(Capability::MintAndBurn).count(), 1);

        assert!(gate.revoke(&vault, Capability::MintAndBurn));
        assert!(!gate.revoke(&vault, Capability::MintAndBurn));
        assert!(gate.require(&vault, Capability::MintAndBurn).is_err());
    }
}
