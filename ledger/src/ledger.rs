//! The ledger core.
//!
//! Owns every account record and is the only writer of principal, assigned
//! rate and accrual timestamps. Each mutating call is one atomic transition:
//! it is staged in full, then applied, or it fails and changes nothing.

use std::collections::HashMap;

use sprout_accrual::accrued_balance;
use sprout_rates::{RateChange, RateHistory, RateRegistry};
use sprout_types::{AccountId, AccountRecord, Amount, Quantity, Rate, Timestamp};

use crate::allowance::{self, Allowances};
use crate::auth::{Capability, CapabilityGate};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::transition::{Stage, Transition};

/// Interest-accruing balance ledger.
pub struct Ledger {
    pub(crate) accounts: HashMap<AccountId, AccountRecord>,
    pub(crate) rates: RateRegistry,
    pub(crate) gate: CapabilityGate,
    pub(crate) allowances: Allowances,
    events: EventBus,
    revision: u64,
}

impl Ledger {
    /// An empty ledger with `admin` as the sole capability holder.
    pub fn new(admin: AccountId, initial_rate: Rate, genesis: Timestamp) -> Self {
        Self::with_registry(CapabilityGate::new(admin), RateRegistry::new(initial_rate, genesis))
    }

    pub(crate) fn with_registry(gate: CapabilityGate, rates: RateRegistry) -> Self {
        Self {
            accounts: HashMap::new(),
            rates,
            gate,
            allowances: Allowances::new(),
            events: EventBus::new(),
            revision: 0,
        }
    }

    /// Build a ledger from configuration, granting the configured minters.
    pub fn from_config(config: &LedgerConfig, genesis: Timestamp) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(config.admin.clone(), config.initial_rate()?, genesis);
        for minter in &config.minters {
            ledger.gate.grant(minter.clone(), Capability::MintAndBurn);
        }
        tracing::info!(
            admin = %config.admin,
            global_rate = %ledger.global_rate(),
            minters = config.minters.len(),
            "ledger initialised"
        );
        Ok(ledger)
    }

    // ── Read surface ────────────────────────────────────────────────────

    /// Computed balance: stored principal grown by the assigned rate since
    /// the last accrual. Zero for unknown accounts.
    pub fn balance_of(&self, account: &AccountId, now: Timestamp) -> Result<Amount, LedgerError> {
        match self.accounts.get(account) {
            Some(record) => Ok(accrued_balance(record, now)?),
            None => Ok(Amount::ZERO),
        }
    }

    /// Stored principal, excluding interest not yet crystallized.
    pub fn principal_balance_of(&self, account: &AccountId) -> Amount {
        self.accounts
            .get(account)
            .map(|r| r.principal)
            .unwrap_or(Amount::ZERO)
    }

    pub fn assigned_rate(&self, account: &AccountId) -> Rate {
        self.accounts
            .get(account)
            .map(|r| r.assigned_rate)
            .unwrap_or(Rate::ZERO)
    }

    pub fn last_accrual(&self, account: &AccountId) -> Option<Timestamp> {
        self.accounts.get(account).and_then(|r| r.last_accrual)
    }

    pub fn record(&self, account: &AccountId) -> Option<&AccountRecord> {
        self.accounts.get(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &AccountRecord)> {
        self.accounts.iter()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn global_rate(&self) -> Rate {
        self.rates.global_rate()
    }

    pub fn rate_history(&self) -> &RateHistory {
        self.rates.history()
    }

    /// Sum of computed balances. Never stored.
    pub fn total_supply(&self, now: Timestamp) -> Result<Amount, LedgerError> {
        self.accounts.values().try_fold(Amount::ZERO, |total, record| {
            total
                .checked_add(accrued_balance(record, now)?)
                .ok_or(LedgerError::Overflow)
        })
    }

    /// Sum of stored principals.
    pub fn total_principal(&self) -> Result<Amount, LedgerError> {
        self.accounts.values().try_fold(Amount::ZERO, |total, record| {
            total.checked_add(record.principal).ok_or(LedgerError::Overflow)
        })
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Quantity {
        self.allowances.get(owner, spender)
    }

    pub fn has_capability(&self, account: &AccountId, capability: Capability) -> bool {
        self.gate.holds(account, capability)
    }

    /// Fail with `Unauthorized` unless `account` holds `capability`.
    pub fn require_capability(
        &self,
        account: &AccountId,
        capability: Capability,
    ) -> Result<(), LedgerError> {
        self.gate.require(account, capability)
    }

    /// Number of transitions applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn subscribe_rate_changes<F>(&mut self, observer: F)
    where
        F: Fn(&RateChange) + Send + Sync + 'static,
    {
        self.rates.subscribe(observer);
    }

    // ── Mutating surface ────────────────────────────────────────────────

    /// Fold pending interest into principal and restart the accrual clock.
    ///
    /// Open to any caller: the computed balance is the same before and after.
    /// Returns the interest credited.
    pub fn crystallize(
        &mut self,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        let mut stage = self.stage(now);
        let interest = stage.crystallize(account)?;
        let transition = stage.finish(interest);
        self.apply(transition);
        Ok(interest)
    }

    /// Credit `amount` of new principal to `account`.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.gate.require(caller, Capability::MintAndBurn)?;
        let mut stage = self.stage(now);
        stage.crystallize(account)?;
        let mut record = stage.record(account);
        if record.is_empty() && !amount.is_zero() {
            let rate = self.rates.assign_rate(&mut record)?;
            stage.emit(LedgerEvent::RateAssigned {
                account: account.clone(),
                rate,
                inherited_from: None,
            });
        }
        record.principal = record
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        stage.put(account, record);
        stage.emit(LedgerEvent::Minted {
            account: account.clone(),
            amount,
        });
        let transition = stage.finish(amount);
        self.apply(transition);
        tracing::info!(account = %account, amount = %amount, "minted");
        Ok(())
    }

    /// Destroy `quantity` of `account`'s balance; `Quantity::Max` burns all of it.
    ///
    /// Returns the amount burned.
    pub fn burn(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        let transition = self.prepare_burn(caller, account, quantity, now)?;
        let burned = transition.resolved();
        self.commit(transition)?;
        Ok(burned)
    }

    /// Compute a burn without applying it.
    ///
    /// The returned transition can be applied with [`Ledger::commit`] as long
    /// as no other transition has been applied in between.
    pub fn prepare_burn(
        &self,
        caller: &AccountId,
        account: &AccountId,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<Transition, LedgerError> {
        self.gate.require(caller, Capability::MintAndBurn)?;
        let mut stage = self.stage(now);
        stage.crystallize(account)?;
        let mut record = stage.record(account);
        let available = record.principal;
        let amount = quantity.resolve(available);
        record.principal = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        stage.put(account, record);
        stage.emit(LedgerEvent::Burned {
            account: account.clone(),
            amount,
        });
        Ok(stage.finish(amount))
    }

    /// Move `quantity` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        self.transfer_from(caller, caller, to, quantity, now)
    }

    /// Move `quantity` from `from` to `to` on behalf of `caller`.
    ///
    /// `caller` must be `from` or hold an allowance covering the resolved
    /// amount. An empty recipient inherits `from`'s assigned rate.
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        let mut stage = self.stage(now);
        stage.crystallize(from)?;
        if to != from {
            stage.crystallize(to)?;
        }

        let mut sender = stage.record(from);
        let available = sender.principal;
        let amount = quantity.resolve(available);

        if caller != from {
            let allowed = self.allowances.get(from, caller);
            if allowed == Quantity::Exact(Amount::ZERO) {
                tracing::warn!(
                    caller = %caller,
                    owner = %from,
                    "transfer by unapproved delegate rejected"
                );
                return Err(LedgerError::Unauthorized {
                    caller: caller.clone(),
                    required: Capability::Delegate,
                });
            }
            let remaining = allowance::spend(allowed, amount).ok_or_else(|| {
                LedgerError::InsufficientAllowance {
                    needed: amount,
                    allowed: allowed.resolve(Amount::ZERO),
                }
            })?;
            // A self-transfer moves nothing and consumes nothing.
            if to != from {
                stage.set_allowance(from, caller, remaining);
            }
        }

        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        if to != from {
            let mut recipient = stage.record(to);
            if recipient.is_empty() && !amount.is_zero() {
                let rate = RateRegistry::propagate_rate(&sender, &mut recipient)?;
                stage.emit(LedgerEvent::RateAssigned {
                    account: to.clone(),
                    rate,
                    inherited_from: Some(from.clone()),
                });
            }
            sender.principal = available.saturating_sub(amount);
            recipient.principal = recipient
                .principal
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
            stage.put(from, sender);
            stage.put(to, recipient);
        }

        stage.emit(LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        let transition = stage.finish(amount);
        self.apply(transition);
        tracing::debug!(from = %from, to = %to, amount = %amount, "transferred");
        Ok(amount)
    }

    /// Let `spender` move up to `allowance` of `owner`'s balance.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, allowance: Quantity) {
        let mut stage = self.stage(Timestamp::EPOCH);
        stage.set_allowance(owner, spender, allowance);
        stage.emit(LedgerEvent::Approved {
            owner: owner.clone(),
            spender: spender.clone(),
            allowance,
        });
        let transition = stage.finish(Amount::ZERO);
        self.apply(transition);
    }

    /// Lower the global rate. Raising it fails with `RateIncreaseRejected`.
    pub fn set_global_rate(
        &mut self,
        caller: &AccountId,
        new_rate: Rate,
        now: Timestamp,
    ) -> Result<RateChange, LedgerError> {
        self.gate.require(caller, Capability::Admin)?;
        let change = self.rates.set_global_rate(new_rate, now)?;
        self.revision += 1;
        self.events.emit(&LedgerEvent::GlobalRateLowered {
            previous: change.previous,
            current: change.current,
            at: change.at,
        });
        Ok(change)
    }

    pub fn grant_mint_and_burn(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.grant_capability(caller, account, Capability::MintAndBurn)
    }

    pub fn revoke_mint_and_burn(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), LedgerError> {
        self.revoke_capability(caller, account, Capability::MintAndBurn)
    }

    pub fn grant_capability(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        capability: Capability,
    ) -> Result<(), LedgerError> {
        self.gate.require(caller, Capability::Admin)?;
        if self.gate.grant(account.clone(), capability) {
            self.revision += 1;
            tracing::info!(account = %account, capability = %capability, "capability granted");
            self.events.emit(&LedgerEvent::CapabilityGranted {
                account: account.clone(),
                capability,
            });
        }
        Ok(())
    }

    pub fn revoke_capability(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        capability: Capability,
    ) -> Result<(), LedgerError> {
        self.gate.require(caller, Capability::Admin)?;
        if self.gate.revoke(account, capability) {
            self.revision += 1;
            tracing::info!(account = %account, capability = %capability, "capability revoked");
            self.events.emit(&LedgerEvent::CapabilityRevoked {
                account: account.clone(),
                capability,
            });
        }
        Ok(())
    }

    /// Apply a transition produced by [`Ledger::prepare_burn`].
    pub fn commit(&mut self, transition: Transition) -> Result<(), LedgerError> {
        if transition.revision != self.revision {
            return Err(LedgerError::StaleTransition {
                prepared: transition.revision,
                current: self.revision,
            });
        }
        self.apply(transition);
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn stage(&self, now: Timestamp) -> Stage<'_> {
        Stage::new(&self.accounts, self.revision, now)
    }

    fn apply(&mut self, transition: Transition) {
        let Transition {
            records,
            allowance,
            events,
            ..
        } = transition;
        for (account, record) in records {
            self.accounts.insert(account, record);
        }
        if let Some((owner, spender, allowance)) = allowance {
            self.allowances.set(owner, spender, allowance);
        }
        self.revision += 1;
        for event in &events {
            if let LedgerEvent::Burned { account, amount } = event {
                tracing::info!(account = %account, amount = %amount, "burned");
            }
            self.events.emit(event);
        }
    }
}
