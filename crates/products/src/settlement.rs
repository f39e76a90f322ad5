use std::sync::Arc;

use provreg_core::{Principal, SettlementError};

/// External fee-settlement service.
///
/// A returned error aborts the creation that requested the transfer; the
/// registry records nothing for it.
pub trait FeeSettlement: Send + Sync {
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), SettlementError>;
}

impl<S> FeeSettlement for Arc<S>
where
    S: FeeSettlement + ?Sized,
{
    fn transfer(&self, amount: u64, from: &Principal, to: &Principal) -> Result<(), SettlementError> {
        (**self).transfer(amount, from, to)
    }
}
