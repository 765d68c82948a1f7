//! Delegated spending allowances.

use sprout_types::{AccountId, Amount, Quantity};
use std::collections::HashMap;

/// `(owner, spender) -> allowance`. `Quantity::Max` is unlimited.
#[derive(Clone, Debug, Default)]
pub struct Allowances {
    entries: HashMap<(AccountId, AccountId), Quantity>,
}

impl Allowances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allowance of `spender` over `owner`'s balance; zero when never approved.
    pub fn get(&self, owner: &AccountId, spender: &AccountId) -> Quantity {
        self.entries
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(Quantity::Exact(Amount::ZERO))
    }

    pub fn set(&mut self, owner: AccountId, spender: AccountId, allowance: Quantity) {
        if allowance == Quantity::Exact(Amount::ZERO) {
            self.entries.remove(&(owner, spender));
        } else {
            self.entries.insert((owner, spender), allowance);
        }
    }
}

/// What remains of `allowed` after spending `amount`; `None` if it does not cover it.
pub fn spend(allowed: Quantity, amount: Amount) -> Option<Quantity> {
    match allowed {
        Quantity::Max => Some(Quantity::Max),
        Quantity::Exact(limit) => limit.checked_sub(amount).map(Quantity::Exact),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pair_is_zero() {
        let a = Allowances::new();
        assert_eq!(
            a.get(&AccountId::new("o"), &AccountId::new("s")),
            Quantity::Exact(Amount::ZERO)
        );
    }

    #[test]
    fn setting_zero_clears() {
        let mut a = Allowances::new();
        let (o, s) = (AccountId::new("o"), AccountId::new("s"));
        a.set(o.clone(), s.clone(), Quantity::Exact(Amount::new(5)));
        assert_eq!(a.get(&o, &s), Quantity::Exact(Amount::new(5)));
        a.set(o.clone(), s.clone(), Quantity::Exact(Amount::ZERO));
        assert!(a.entries.is_empty());
    }

    #[test]
    fn spend_finite_and_unlimited() {
        assert_eq!(
            spend(Quantity::Exact(Amount::new(10)), Amount::new(4)),
            Some(Quantity::Exact(Amount::new(6)))
        );
        assert_eq!(spend(Quantity::Exact(Amount::new(3)), Amount::new(4)), None);
        assert_eq!(spend(Quantity::Max, Amount::new(u128::MAX)), Some(Quantity::Max));
    }
}
