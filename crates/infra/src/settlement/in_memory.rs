use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use provreg_core::{Principal, SettlementError};
use provreg_products::FeeSettlement;

/// A settled fee payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: u64,
    pub from: Principal,
    pub to: Principal,
}

#[derive(Debug, Default)]
struct LedgerState {
    transfers: Vec<Transfer>,
    balances: HashMap<Principal, u64>,
    enforce_balances: bool,
    failing: bool,
    fail_next: usize,
}

/// In-memory fee ledger for tests/dev.
///
/// Records every successful transfer. Balances are only enforced once an account
/// has been funded with [`InMemoryLedger::with_balance`].
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund `account` and switch the ledger to balance-checked mode.
    pub fn with_balance(self, account: impl Into<Principal>, amount: u64) -> Self {
        if let Ok(mut state) = self.inner.lock() {
            state.enforce_balances = true;
            state.balances.insert(account.into(), amount);
        }
        self
    }

    /// Reject every transfer until switched back.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut state) = self.inner.lock() {
            state.failing = failing;
        }
    }

    /// Reject the next transfer only.
    pub fn fail_next(&self) {
        if let Ok(mut state) = self.inner.lock() {
            state.fail_next += 1;
        }
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.inner
            .lock()
            .map(|state| state.transfers.clone())
            .unwrap_or_default()
    }

    pub fn balance_of(&self, account: &Principal) -> u64 {
        self.inner
            .lock()
            .ok()
            .and_then(|state| state.balances.get(account).copied())
            .unwrap_or(0)
    }

    /// Sum of all fees received by `account`.
    pub fn total_received(&self, account: &Principal) -> u64 {
        self.transfers()
            .iter()
            .filter(|t| &t.to == account)
            .map(|t| t.amount)
            .sum()
    }
}

impl FeeSettlement for InMemoryLedger {
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), SettlementError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| SettlementError::Rejected("ledger lock poisoned".to_string()))?;

        if state.failing {
            return Err(SettlementError::Rejected("ledger is rejecting transfers".to_string()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(SettlementError::Rejected("transfer declined".to_string()));
        }

        if state.enforce_balances {
            let available = state.balances.get(from).copied().unwrap_or(0);
            if available < amount {
                return Err(SettlementError::InsufficientFunds {
                    available,
                    required: amount,
                });
            }
            state.balances.insert(from.clone(), available - amount);
        }

        let credited = state.balances.entry(to.clone()).or_insert(0);
        *credited = credited.saturating_add(amount);

        state.transfers.push(Transfer {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }
}
