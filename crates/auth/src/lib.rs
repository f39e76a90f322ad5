//! `provreg-auth`: authority verification boundary.
//!
//! This crate is intentionally decoupled from transport and storage: the registry
//! consumes verification as a plain predicate over a caller identity.

pub mod authority;

pub use authority::{AllowList, AuthorityVerifier, InMemoryAuthoritySet};
