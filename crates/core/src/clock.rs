//! Logical time source.

/// Logical time (seconds or block height, depending on the host).
pub type Timestamp = u64;

/// Supplies the current logical time for `timestamp` and `expiry` comparisons.
///
/// Implementations must be non-decreasing across calls.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

impl<C> Clock for std::sync::Arc<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
