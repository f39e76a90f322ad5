use serde::{Deserialize, Serialize};

use provreg_core::{Principal, ProductId, Timestamp};
use provreg_events::Event;

use crate::product::{Product, ProductUpdate};

// `registry_version` on every event is the registry version the event was
// decided against. `ProductRegistry::apply` only accepts it at that version.

/// Event: AuthorityContractBound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityContractBound {
    pub registry_version: u64,
    pub authority: Principal,
    pub occurred_at: Timestamp,
}

/// Event: CreationFeeChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationFeeChanged {
    pub registry_version: u64,
    pub fee: u64,
    pub occurred_at: Timestamp,
}

/// Event: ProductCreated.
///
/// `fee` must be settled from `payer` to `payee` before the event is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub registry_version: u64,
    pub product_id: ProductId,
    pub product: Product,
    pub fee: u64,
    pub payer: Principal,
    pub payee: Principal,
    pub occurred_at: Timestamp,
}

/// Event: ProductUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdated {
    pub registry_version: u64,
    pub product_id: ProductId,
    pub previous_name: String,
    pub update: ProductUpdate,
    pub occurred_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    AuthorityContractBound(AuthorityContractBound),
    CreationFeeChanged(CreationFeeChanged),
    ProductCreated(ProductCreated),
    ProductUpdated(ProductUpdated),
}

impl RegistryEvent {
    /// Registry version this event was decided against.
    pub fn registry_version(&self) -> u64 {
        match self {
            RegistryEvent::AuthorityContractBound(e) => e.registry_version,
            RegistryEvent::CreationFeeChanged(e) => e.registry_version,
            RegistryEvent::ProductCreated(e) => e.registry_version,
            RegistryEvent::ProductUpdated(e) => e.registry_version,
        }
    }
}

impl From<AuthorityContractBound> for RegistryEvent {
    fn from(value: AuthorityContractBound) -> Self {
        RegistryEvent::AuthorityContractBound(value)
    }
}

impl From<CreationFeeChanged> for RegistryEvent {
    fn from(value: CreationFeeChanged) -> Self {
        RegistryEvent::CreationFeeChanged(value)
    }
}

impl From<ProductCreated> for RegistryEvent {
    fn from(value: ProductCreated) -> Self {
        RegistryEvent::ProductCreated(value)
    }
}

impl From<ProductUpdated> for RegistryEvent {
    fn from(value: ProductUpdated) -> Self {
        RegistryEvent::ProductUpdated(value)
    }
}

impl Event for RegistryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RegistryEvent::AuthorityContractBound(_) => "registry.authority.bound",
            RegistryEvent::CreationFeeChanged(_) => "registry.fee.changed",
            RegistryEvent::ProductCreated(_) => "registry.product.created",
            RegistryEvent::ProductUpdated(_) => "registry.product.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            RegistryEvent::AuthorityContractBound(e) => e.occurred_at,
            RegistryEvent::CreationFeeChanged(e) => e.occurred_at,
            RegistryEvent::ProductCreated(e) => e.occurred_at,
            RegistryEvent::ProductUpdated(e) => e.occurred_at,
        }
    }
}
