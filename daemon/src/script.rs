//! Replayable operation scripts.
//!
//! A script is a JSON document listing timed ledger operations:
//!
//! ```json
//! {
//!   "genesis": 1700000000,
//!   "steps": [
//!     { "at": 0,    "op": "mint", "caller": "vault", "account": "alice", "amount": "1000" },
//!     { "at": 3600, "op": "transfer", "caller": "alice", "to": "bob", "amount": "max" }
//!   ]
//! }
//! ```
//!
//! `at` is seconds after `genesis`. Amounts are decimal whole units or `"max"`.

use serde::{Deserialize, Serialize};
use sprout_ledger::{Ledger, LedgerError};
use sprout_types::{AccountId, Amount, Quantity, Rate, Timestamp};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub genesis: u64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub at: u64,
    #[serde(flatten)]
    pub op: Op,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Mint {
        caller: AccountId,
        account: AccountId,
        amount: String,
    },
    Burn {
        caller: AccountId,
        account: AccountId,
        amount: String,
    },
    Transfer {
        caller: AccountId,
        to: AccountId,
        amount: String,
    },
    TransferFrom {
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: String,
    },
    Approve {
        owner: AccountId,
        spender: AccountId,
        amount: String,
    },
    Crystallize {
        account: AccountId,
    },
    SetGlobalRate {
        caller: AccountId,
        /// Per-second rate at 1e18 precision.
        rate: u64,
    },
    GrantMintAndBurn {
        caller: AccountId,
        account: AccountId,
    },
    RevokeMintAndBurn {
        caller: AccountId,
        account: AccountId,
    },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Mint { .. } => "mint",
            Op::Burn { .. } => "burn",
            Op::Transfer { .. } => "transfer",
            Op::TransferFrom { .. } => "transfer_from",
            Op::Approve { .. } => "approve",
            Op::Crystallize { .. } => "crystallize",
            Op::SetGlobalRate { .. } => "set_global_rate",
            Op::GrantMintAndBurn { .. } => "grant_mint_and_burn",
            Op::RevokeMintAndBurn { .. } => "revoke_mint_and_burn",
        }
    }
}

/// Result of one replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account: AccountId,
    pub balance: String,
    pub principal: String,
    pub assigned_rate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub final_at: u64,
    pub global_rate: String,
    pub total_supply: String,
    pub steps: Vec<StepOutcome>,
    pub accounts: Vec<AccountSummary>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("step {index}: bad amount: {source}")]
    Amount {
        index: usize,
        source: sprout_types::ParseError,
    },
    #[error("step {index} ({op}) failed: {source}")]
    Step {
        index: usize,
        op: &'static str,
        source: LedgerError,
    },
    #[error("reading final balances: {0}")]
    Summary(#[from] LedgerError),
}

fn quantity(index: usize, text: &str) -> Result<Quantity, ScriptError> {
    text.parse()
        .map_err(|source| ScriptError::Amount { index, source })
}

/// Exact amounts only; `"max"` has no meaning for a mint.
fn exact(index: usize, text: &str) -> Result<Amount, ScriptError> {
    text.parse()
        .map_err(|source| ScriptError::Amount { index, source })
}

fn apply(
    ledger: &mut Ledger,
    index: usize,
    op: &Op,
    now: Timestamp,
) -> Result<Option<Amount>, ScriptError> {
    let step = |source| ScriptError::Step {
        index,
        op: op.name(),
        source,
    };
    let moved = match op {
        Op::Mint {
            caller,
            account,
            amount,
        } => {
            let amount = exact(index, amount)?;
            ledger.mint(caller, account, amount, now).map_err(step)?;
            Some(amount)
        }
        Op::Burn {
            caller,
            account,
            amount,
        } => Some(
            ledger
                .burn(caller, account, quantity(index, amount)?, now)
                .map_err(step)?,
        ),
        Op::Transfer { caller, to, amount } => Some(
            ledger
                .transfer(caller, to, quantity(index, amount)?, now)
                .map_err(step)?,
        ),
        Op::TransferFrom {
            caller,
            from,
            to,
            amount,
        } => Some(
            ledger
                .transfer_from(caller, from, to, quantity(index, amount)?, now)
                .map_err(step)?,
        ),
        Op::Approve {
            owner,
            spender,
            amount,
        } => {
            ledger.approve(owner, spender, quantity(index, amount)?);
            None
        }
        Op::Crystallize { account } => Some(ledger.crystallize(account, now).map_err(step)?),
        Op::SetGlobalRate { caller, rate } => {
            ledger
                .set_global_rate(caller, Rate::new(u128::from(*rate)), now)
                .map_err(step)?;
            None
        }
        Op::GrantMintAndBurn { caller, account } => {
            ledger.grant_mint_and_burn(caller, account).map_err(step)?;
            None
        }
        Op::RevokeMintAndBurn { caller, account } => {
            ledger.revoke_mint_and_burn(caller, account).map_err(step)?;
            None
        }
    };
    Ok(moved)
}

/// Replay `script` against `ledger`.
///
/// Failed steps are recorded in the report and replay continues, unless
/// `strict` is set, in which case the first failure is returned.
pub fn replay(ledger: &mut Ledger, script: &Script, strict: bool) -> Result<Report, ScriptError> {
    let mut steps = Vec::with_capacity(script.steps.len());
    let mut final_at = 0;

    for (index, step) in script.steps.iter().enumerate() {
        let now = Timestamp::new(script.genesis).saturating_add_secs(step.at);
        final_at = final_at.max(step.at);
        let outcome = match apply(ledger, index, &step.op, now) {
            Ok(amount) => StepOutcome {
                index,
                op: step.op.name(),
                at: step.at,
                amount: amount.map(|a| a.to_string()),
                error: None,
            },
            Err(e) if strict => return Err(e),
            Err(e) => {
                tracing::warn!(index, op = step.op.name(), error = %e, "step failed");
                StepOutcome {
                    index,
                    op: step.op.name(),
                    at: step.at,
                    amount: None,
                    error: Some(e.to_string()),
                }
            }
        };
        steps.push(outcome);
    }

    let end = Timestamp::new(script.genesis).saturating_add_secs(final_at);
    let mut accounts = ledger
        .accounts()
        .map(|(id, record)| (id.clone(), record.principal, record.assigned_rate))
        .collect::<Vec<_>>();
    accounts.sort_by(|a, b| a.0.cmp(&b.0));
    let accounts = accounts
        .into_iter()
        .map(|(account, principal, rate)| {
            Ok(AccountSummary {
                balance: ledger.balance_of(&account, end)?.to_string(),
                principal: principal.to_string(),
                assigned_rate: rate.to_string(),
                account,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(Report {
        final_at,
        global_rate: ledger.global_rate().to_string(),
        total_supply: ledger.total_supply(end)?.to_string(),
        steps,
        accounts,
    })
}
