//! Registry error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the registry.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Field whose create-time validation failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidField {
    ProductName,
    Hash,
    MaxQuantity,
    Origin,
    BatchId,
    Description,
    ProductType,
    Category,
    Location,
    Currency,
    MinQuantity,
    Expiry,
    Weight,
    Dimensions,
    Material,
    Certification,
}

impl InvalidField {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidField::ProductName => "product name",
            InvalidField::Hash => "hash",
            InvalidField::MaxQuantity => "max quantity",
            InvalidField::Origin => "origin",
            InvalidField::BatchId => "batch id",
            InvalidField::Description => "description",
            InvalidField::ProductType => "product type",
            InvalidField::Category => "category",
            InvalidField::Location => "location",
            InvalidField::Currency => "currency",
            InvalidField::MinQuantity => "min quantity",
            InvalidField::Expiry => "expiry",
            InvalidField::Weight => "weight",
            InvalidField::Dimensions => "dimensions",
            InvalidField::Material => "material",
            InvalidField::Certification => "certification",
        }
    }

    /// Stable numeric code, compatible with the on-chain registry's error constants.
    pub fn code(self) -> u32 {
        match self {
            InvalidField::ProductName => 101,
            InvalidField::MaxQuantity => 102,
            InvalidField::Origin => 103,
            InvalidField::BatchId => 104,
            InvalidField::Description => 105,
            InvalidField::MinQuantity => 110,
            InvalidField::Expiry => 111,
            InvalidField::ProductType => 115,
            InvalidField::Category => 116,
            InvalidField::Location => 117,
            InvalidField::Currency => 118,
            InvalidField::Hash => 120,
            InvalidField::Weight => 121,
            InvalidField::Dimensions => 122,
            InvalidField::Material => 123,
            InvalidField::Certification => 124,
        }
    }
}

impl core::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by the fee-settlement collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Registry-level error.
///
/// Every failure is deterministic and reported to the immediate caller; nothing
/// in the registry retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not allowed to perform the operation.
    #[error("not authorized")]
    NotAuthorized,

    /// A create-time field failed validation.
    #[error("invalid {0}")]
    InvalidField(InvalidField),

    /// Name or content hash is already indexed.
    #[error("product already exists")]
    ProductAlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("max products exceeded")]
    MaxProductsExceeded,

    /// No authority contract is bound.
    #[error("authority not verified")]
    AuthorityNotVerified,

    /// An update parameter failed validation.
    #[error("invalid update parameter")]
    InvalidUpdateParam,

    #[error("authority contract already bound")]
    AuthorityAlreadyBound,

    #[error("invalid authority identity")]
    InvalidAuthorityIdentity,

    /// The creation fee could not be transferred; nothing was recorded.
    #[error("fee settlement failed: {0}")]
    Settlement(#[from] SettlementError),

    /// An event was applied to a registry that moved on since it was decided.
    #[error("stale event: decided at version {decided_at}, registry is at {current}")]
    StaleEvent { decided_at: u64, current: u64 },
}

impl RegistryError {
    pub fn invalid(field: InvalidField) -> Self {
        Self::InvalidField(field)
    }

    /// Stable numeric code for the error kind.
    pub fn code(&self) -> u32 {
        match self {
            RegistryError::NotAuthorized => 100,
            RegistryError::InvalidField(field) => field.code(),
            RegistryError::ProductAlreadyExists => 106,
            RegistryError::NotFound => 107,
            RegistryError::AuthorityAlreadyBound => 108,
            RegistryError::AuthorityNotVerified => 109,
            RegistryError::InvalidAuthorityIdentity => 112,
            RegistryError::InvalidUpdateParam => 113,
            RegistryError::MaxProductsExceeded => 114,
            RegistryError::Settlement(_) => 119,
            RegistryError::StaleEvent { .. } => 125,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL_FIELDS: [InvalidField; 16] = [
        InvalidField::ProductName,
        InvalidField::Hash,
        InvalidField::MaxQuantity,
        InvalidField::Origin,
        InvalidField::BatchId,
        InvalidField::Description,
        InvalidField::ProductType,
        InvalidField::Category,
        InvalidField::Location,
        InvalidField::Currency,
        InvalidField::MinQuantity,
        InvalidField::Expiry,
        InvalidField::Weight,
        InvalidField::Dimensions,
        InvalidField::Material,
        InvalidField::Certification,
    ];

    #[test]
    fn codes_are_unique() {
        let mut errors: Vec<RegistryError> =
            ALL_FIELDS.iter().copied().map(RegistryError::invalid).collect();
        errors.extend([
            RegistryError::NotAuthorized,
            RegistryError::ProductAlreadyExists,
            RegistryError::NotFound,
            RegistryError::MaxProductsExceeded,
            RegistryError::AuthorityNotVerified,
            RegistryError::InvalidUpdateParam,
            RegistryError::AuthorityAlreadyBound,
            RegistryError::InvalidAuthorityIdentity,
            RegistryError::Settlement(SettlementError::Rejected("x".into())),
            RegistryError::StaleEvent { decided_at: 0, current: 1 },
        ]);

        let codes: HashSet<u32> = errors.iter().map(RegistryError::code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn known_codes_match_contract_constants() {
        assert_eq!(RegistryError::NotAuthorized.code(), 100);
        assert_eq!(RegistryError::invalid(InvalidField::ProductName).code(), 101);
        assert_eq!(RegistryError::ProductAlreadyExists.code(), 106);
        assert_eq!(RegistryError::MaxProductsExceeded.code(), 114);
        assert_eq!(RegistryError::invalid(InvalidField::Hash).code(), 120);
        assert_eq!(RegistryError::StaleEvent { decided_at: 0, current: 1 }.code(), 125);
    }

    #[test]
    fn display_names_the_field() {
        let err = RegistryError::invalid(InvalidField::BatchId);
        assert_eq!(err.to_string(), "invalid batch id");
    }

    #[test]
    fn settlement_error_converts() {
        let err: RegistryError = SettlementError::InsufficientFunds {
            available: 1,
            required: 500,
        }
        .into();
        assert!(matches!(err, RegistryError::Settlement(_)));
    }
}
