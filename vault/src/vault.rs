//! The vault: the only holder of the mint-and-burn capability in a typical
//! deployment, sitting between the external asset and the ledger.

use sprout_ledger::{Capability, Ledger};
use sprout_store::ExternalAsset;
use sprout_types::{AccountId, Amount, Clock, Quantity};

use crate::error::VaultError;

pub struct Vault<A: ExternalAsset, C: Clock> {
    ledger: Ledger,
    asset: A,
    clock: C,
    /// Identity the vault acts under when minting and burning.
    identity: AccountId,
}

impl<A: ExternalAsset, C: Clock> Vault<A, C> {
    /// Wrap `ledger`. `identity` must hold the mint-and-burn capability for
    /// deposits and redemptions to succeed.
    pub fn new(ledger: Ledger, asset: A, clock: C, identity: AccountId) -> Self {
        Self {
            ledger,
            asset,
            clock,
            identity,
        }
    }

    pub fn identity(&self) -> &AccountId {
        &self.identity
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn asset(&self) -> &A {
        &self.asset
    }

    pub fn asset_mut(&mut self) -> &mut A {
        &mut self.asset
    }

    pub fn into_parts(self) -> (Ledger, A, C) {
        (self.ledger, self.asset, self.clock)
    }

    pub fn balance_of(&self, account: &AccountId) -> Result<Amount, VaultError> {
        Ok(self.ledger.balance_of(account, self.clock.now())?)
    }

    pub fn principal_balance_of(&self, account: &AccountId) -> Amount {
        self.ledger.principal_balance_of(account)
    }

    /// Liabilities not covered by custody: total computed supply minus
    /// what the asset holds. Interest is paid from custody, so this grows
    /// unless custody is topped up.
    pub fn shortfall(&self) -> Result<Amount, VaultError> {
        let supply = self.ledger.total_supply(self.clock.now())?;
        Ok(supply.saturating_sub(self.asset.custody_balance()))
    }

    /// Take `amount` of the external asset from `account` and credit the
    /// same amount on the ledger.
    pub fn deposit(&mut self, account: &AccountId, amount: Amount) -> Result<(), VaultError> {
        let now = self.clock.now();
        // Authorization failures surface before any funds move.
        self.ledger
            .require_capability(&self.identity, Capability::MintAndBurn)?;

        self.asset.collect(account, amount).map_err(|source| {
            tracing::warn!(
                account = %account,
                amount = %amount,
                error = %source,
                "deposit collect failed"
            );
            VaultError::DepositTransferFailed {
                account: account.clone(),
                amount,
                source,
            }
        })?;

        if let Err(mint) = self.ledger.mint(&self.identity, account, amount, now) {
            // Overflow or a clock behind the account's last accrual; hand the
            // funds back.
            if let Err(refund) = self.asset.release(account, amount) {
                tracing::error!(
                    account = %account,
                    amount = %amount,
                    error = %refund,
                    "deposit refund failed"
                );
                return Err(VaultError::DepositRefundFailed {
                    account: account.clone(),
                    amount,
                    mint,
                    refund,
                });
            }
            return Err(mint.into());
        }
        tracing::info!(account = %account, amount = %amount, "deposit");
        Ok(())
    }

    /// Burn `quantity` of `account`'s balance and pay it out.
    ///
    /// The burn is prepared first, the payout attempted, and the burn
    /// committed only once the payout has gone through. Returns the amount
    /// paid.
    pub fn redeem(
        &mut self,
        account: &AccountId,
        quantity: Quantity,
    ) -> Result<Amount, VaultError> {
        let now = self.clock.now();
        let transition = self
            .ledger
            .prepare_burn(&self.identity, account, quantity, now)?;
        let amount = transition.resolved();

        self.asset.release(account, amount).map_err(|source| {
            tracing::warn!(
                account = %account,
                amount = %amount,
                error = %source,
                "redeem payout failed"
            );
            VaultError::RedeemTransferFailed {
                account: account.clone(),
                amount,
                source,
            }
        })?;

        self.ledger.commit(transition)?;
        tracing::info!(account = %account, amount = %amount, "redeem");
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_ledger::{LedgerConfig, LedgerError};
    use sprout_nullables::{NullAsset, NullClock};
    use sprout_store::AssetError;
    use sprout_types::Timestamp;

    const HOUR: u64 = 3600;

    fn id(s: &str) -> AccountId {
        AccountId::new(s)
    }

    fn whole(n: u128) -> Amount {
        Amount::from_whole(n).unwrap()
    }

    fn make_vault(clock: &NullClock) -> Vault<NullAsset, &NullClock> {
        let config = LedgerConfig {
            minters: vec![id("vault")],
            ..LedgerConfig::default()
        };
        let ledger = Ledger::from_config(&config, clock.now()).unwrap();
        let mut asset = NullAsset::new();
        asset.fund(&id("alice"), whole(5000));
        Vault::new(ledger, asset, clock, id("vault"))
    }

    #[test]
    fn deposit_mints_one_to_one() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(1000)).unwrap();

        assert_eq!(vault.balance_of(&id("alice")).unwrap(), whole(1000));
        assert_eq!(vault.asset().custody_balance(), whole(1000));
        assert_eq!(vault.asset().holdings_of(&id("alice")), whole(4000));
    }

    #[test]
    fn failed_collect_mints_nothing() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.asset_mut().fail_next_collect();

        let err = vault.deposit(&id("alice"), whole(10)).unwrap_err();
        assert!(matches!(err, VaultError::DepositTransferFailed { .. }));
        assert!(vault.principal_balance_of(&id("alice")).is_zero());
    }

    #[test]
    fn deposit_beyond_holdings_is_rejected() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        let err = vault.deposit(&id("alice"), whole(6000)).unwrap_err();
        match err {
            VaultError::DepositTransferFailed { source, .. } => {
                assert!(matches!(source, AssetError::InsufficientFunds { .. }))
            }
            other => panic!("expected DepositTransferFailed, got {other:?}"),
        }
    }

    #[test]
    fn unauthorized_vault_moves_no_funds() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault
            .ledger_mut()
            .revoke_mint_and_burn(&id("admin"), &id("vault"))
            .unwrap();

        let err = vault.deposit(&id("alice"), whole(10)).unwrap_err();
        assert!(matches!(
            err,
            VaultError::Ledger(LedgerError::Unauthorized {
                required: Capability::MintAndBurn,
                ..
            })
        ));
        assert_eq!(vault.asset().holdings_of(&id("alice")), whole(5000));
        assert!(vault.asset().custody_balance().is_zero());
    }

    #[test]
    fn failed_mint_refunds_collected_funds() {
        let clock = NullClock::new(Timestamp::new(HOUR));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(10)).unwrap();

        clock.set(Timestamp::new(0));
        let err = vault.deposit(&id("alice"), whole(10)).unwrap_err();
        assert!(matches!(
            err,
            VaultError::Ledger(LedgerError::ClockRegression { .. })
        ));
        assert_eq!(vault.asset().holdings_of(&id("alice")), whole(4990));
        assert_eq!(vault.asset().custody_balance(), whole(10));
    }

    #[test]
    fn failed_refund_reports_stranded_funds() {
        let clock = NullClock::new(Timestamp::new(HOUR));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(10)).unwrap();

        clock.set(Timestamp::new(0));
        vault.asset_mut().fail_next_release();
        let err = vault.deposit(&id("alice"), whole(10)).unwrap_err();
        match err {
            VaultError::DepositRefundFailed {
                amount,
                mint,
                refund,
                ..
            } => {
                assert_eq!(amount, whole(10));
                assert!(matches!(mint, LedgerError::ClockRegression { .. }));
                assert!(matches!(refund, AssetError::Rejected(_)));
            }
            other => panic!("expected DepositRefundFailed, got {other:?}"),
        }
        assert_eq!(vault.asset().custody_balance(), whole(20));
        assert_eq!(vault.principal_balance_of(&id("alice")), whole(10));
    }

    #[test]
    fn redeem_max_pays_accrued_balance() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(1000)).unwrap();
        vault.asset_mut().fund_custody(whole(1));

        clock.advance(HOUR);
        let expected = vault.balance_of(&id("alice")).unwrap();
        assert!(vault.shortfall().unwrap().is_zero());

        let paid = vault.redeem(&id("alice"), Quantity::Max).unwrap();
        assert_eq!(paid, expected);
        assert!(vault.balance_of(&id("alice")).unwrap().is_zero());
        assert_eq!(
            vault.asset().holdings_of(&id("alice")),
            whole(4000).checked_add(expected).unwrap()
        );
    }

    #[test]
    fn failed_payout_leaves_ledger_untouched() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(1000)).unwrap();
        clock.advance(HOUR);

        let record = *vault.ledger().record(&id("alice")).unwrap();
        let revision = vault.ledger().revision();
        vault.asset_mut().fail_next_release();

        let err = vault.redeem(&id("alice"), Quantity::Exact(whole(500))).unwrap_err();
        assert!(matches!(err, VaultError::RedeemTransferFailed { .. }));
        assert_eq!(*vault.ledger().record(&id("alice")).unwrap(), record);
        assert_eq!(vault.ledger().revision(), revision);
        assert_eq!(vault.asset().custody_balance(), whole(1000));

        // Retrying is safe and succeeds once the payout goes through.
        let paid = vault.redeem(&id("alice"), Quantity::Exact(whole(500))).unwrap();
        assert_eq!(paid, whole(500));
    }

    #[test]
    fn unbacked_interest_fails_redeem_cleanly() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(1000)).unwrap();
        clock.advance(HOUR);
        assert!(!vault.shortfall().unwrap().is_zero());

        let before = vault.balance_of(&id("alice")).unwrap();
        let err = vault.redeem(&id("alice"), Quantity::Max).unwrap_err();
        assert!(matches!(
            err,
            VaultError::RedeemTransferFailed {
                source: AssetError::InsufficientFunds { .. },
                ..
            }
        ));
        assert_eq!(vault.balance_of(&id("alice")).unwrap(), before);
    }

    #[test]
    fn redeem_more_than_balance_fails_before_payout() {
        let clock = NullClock::new(Timestamp::new(0));
        let mut vault = make_vault(&clock);
        vault.deposit(&id("alice"), whole(10)).unwrap();

        let err = vault.redeem(&id("alice"), Quantity::Exact(whole(11))).unwrap_err();
        assert!(matches!(
            err,
            VaultError::Ledger(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(vault.asset().custody_balance(), whole(10));
    }
}
