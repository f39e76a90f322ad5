//! Tracing/logging setup shared by registry hosts and tests.

/// Initialize process-wide logging with the default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{DEFAULT_DIRECTIVE, init_with_default};
