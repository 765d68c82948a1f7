#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sprout_ledger::Ledger;
use sprout_types::{AccountId, Amount, Quantity, Rate, Timestamp};

#[derive(Debug, Arbitrary)]
enum Op {
    Mint { account: u8, amount: u64 },
    Burn { account: u8, amount: Option<u64> },
    Transfer { from: u8, to: u8, amount: Option<u64> },
    Crystallize { account: u8 },
    SetRate { rate: u64 },
    Wait { secs: u32 },
}

fn account(n: u8) -> AccountId {
    AccountId::new(format!("acct{}", n % 4))
}

fn quantity(amount: Option<u64>) -> Quantity {
    amount.map_or(Quantity::Max, |a| Quantity::Exact(Amount::new(u128::from(a))))
}

// Random operation sequences. Must never panic; failed operations leave the
// touched records unchanged and the global rate never rises.
fuzz_target!(|ops: Vec<Op>| {
    let admin = AccountId::new("admin");
    let mut ledger = Ledger::new(admin.clone(), Rate::new(50_000_000_000), Timestamp::new(0));
    let _ = ledger.grant_mint_and_burn(&admin, &admin);
    let mut now = Timestamp::new(0);

    for op in ops {
        let revision = ledger.revision();
        let rate_before = ledger.global_rate();
        let result = match op {
            Op::Mint { account: a, amount } => ledger
                .mint(&admin, &account(a), Amount::new(u128::from(amount)), now)
                .map(|_| ()),
            Op::Burn { account: a, amount } => ledger
                .burn(&admin, &account(a), quantity(amount), now)
                .map(|_| ()),
            Op::Transfer { from, to, amount } => ledger
                .transfer(&account(from), &account(to), quantity(amount), now)
                .map(|_| ()),
            Op::Crystallize { account: a } => ledger.crystallize(&account(a), now).map(|_| ()),
            Op::SetRate { rate } => ledger
                .set_global_rate(&admin, Rate::new(u128::from(rate)), now)
                .map(|_| ()),
            Op::Wait { secs } => {
                now = now.saturating_add_secs(u64::from(secs));
                Ok(())
            }
        };
        if result.is_err() {
            assert_eq!(ledger.revision(), revision);
        }
        assert!(ledger.global_rate() <= rate_before);
        let _ = ledger.total_supply(now);
    }
});
