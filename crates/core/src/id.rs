//! Strongly-typed identifiers used across the registry.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Well-known burn address that can never act as the fee authority.
pub const NULL_PRINCIPAL: &str = "SP000000000000000000002Q6VF78";

/// Identity of a caller or contract (opaque, supplied by the host per call).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(Cow<'static, str>);

impl Principal {
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// The reserved null/burn identity.
    pub const fn null() -> Self {
        Self(Cow::Borrowed(NULL_PRINCIPAL))
    }

    pub fn is_null(&self) -> bool {
        self.as_str() == NULL_PRINCIPAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Principal {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Principal {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Identifier of a product record.
///
/// Assigned by the registry in strictly increasing order starting at 0; never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ProductId> for u64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_principal_is_recognised() {
        assert!(Principal::null().is_null());
        assert!(Principal::new(NULL_PRINCIPAL.to_string()).is_null());
        assert!(!Principal::from("ST2TEST").is_null());
    }

    #[test]
    fn principal_serializes_transparently() {
        let json = serde_json::to_string(&Principal::from("ST1TEST")).unwrap();
        assert_eq!(json, "\"ST1TEST\"");
    }

    #[test]
    fn product_id_parses_and_displays() {
        let id: ProductId = "42".parse().unwrap();
        assert_eq!(id, ProductId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("x".parse::<ProductId>().is_err());
    }
}
