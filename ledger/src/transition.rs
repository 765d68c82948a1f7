//! Staged ledger transitions.
//!
//! Every mutating operation is computed against copies of the records it
//! touches. Nothing reaches the ledger until the whole operation has
//! succeeded and the resulting [`Transition`] is applied.

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use sprout_accrual::accrued_balance;
use sprout_types::{AccountId, AccountRecord, Amount, Quantity, Timestamp};
use std::collections::HashMap;

/// The complete effect of one operation, ready to be committed.
#[derive(Clone, Debug)]
pub struct Transition {
    pub(crate) revision: u64,
    pub(crate) records: Vec<(AccountId, AccountRecord)>,
    pub(crate) allowance: Option<(AccountId, AccountId, Quantity)>,
    pub(crate) events: Vec<LedgerEvent>,
    pub(crate) resolved: Amount,
}

impl Transition {
    /// The amount the operation resolved to (MAX already substituted).
    pub fn resolved(&self) -> Amount {
        self.resolved
    }

    /// Ledger revision the transition was computed against.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Post-transition record of `account`, if the transition touches it.
    pub fn staged_record(&self, account: &AccountId) -> Option<&AccountRecord> {
        self.records
            .iter()
            .find(|(id, _)| id == account)
            .map(|(_, record)| record)
    }
}

pub(crate) struct Stage<'a> {
    accounts: &'a HashMap<AccountId, AccountRecord>,
    revision: u64,
    now: Timestamp,
    records: Vec<(AccountId, AccountRecord)>,
    allowance: Option<(AccountId, AccountId, Quantity)>,
    events: Vec<LedgerEvent>,
}

impl<'a> Stage<'a> {
    pub(crate) fn new(
        accounts: &'a HashMap<AccountId, AccountRecord>,
        revision: u64,
        now: Timestamp,
    ) -> Self {
        Self {
            accounts,
            revision,
            now,
            records: Vec::new(),
            allowance: None,
            events: Vec::new(),
        }
    }

    /// Current view of `account`: staged copy, stored record, or an empty record.
    pub(crate) fn record(&self, account: &AccountId) -> AccountRecord {
        self.records
            .iter()
            .find(|(id, _)| id == account)
            .map(|(_, record)| *record)
            .or_else(|| self.accounts.get(account).copied())
            .unwrap_or_default()
    }

    pub(crate) fn put(&mut self, account: &AccountId, record: AccountRecord) {
        match self.records.iter_mut().find(|(id, _)| id == account) {
            Some((_, staged)) => *staged = record,
            None => self.records.push((account.clone(), record)),
        }
    }

    /// Fold pending interest into principal and restart the accrual clock.
    ///
    /// Returns the interest credited. The timestamp moves to `now` even when
    /// nothing was owed, but never backwards: a `now` earlier than the last
    /// accrual fails with `ClockRegression`.
    pub(crate) fn crystallize(&mut self, account: &AccountId) -> Result<Amount, LedgerError> {
        let mut record = self.record(account);
        if let Some(last) = record.last_accrual.filter(|last| *last > self.now) {
            tracing::warn!(
                account = %account,
                last = %last,
                now = %self.now,
                "clock behind last accrual"
            );
            return Err(LedgerError::ClockRegression {
                account: account.clone(),
                last,
                now: self.now,
            });
        }
        let balance = accrued_balance(&record, self.now)?;
        let interest = balance.saturating_sub(record.principal);
        if !interest.is_zero() {
            record.principal = balance;
            self.events.push(LedgerEvent::InterestCrystallized {
                account: account.clone(),
                interest,
                at: self.now,
            });
        }
        record.last_accrual = Some(self.now);
        self.put(account, record);
        tracing::debug!(account = %account, interest = %interest, at = %self.now, "crystallized");
        Ok(interest)
    }

    pub(crate) fn set_allowance(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        allowance: Quantity,
    ) {
        self.allowance = Some((owner.clone(), spender.clone(), allowance));
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub(crate) fn finish(self, resolved: Amount) -> Transition {
        Transition {
            revision: self.revision,
            records: self.records,
            allowance: self.allowance,
            events: self.events,
            resolved,
        }
    }
}
