use serde::{Deserialize, Serialize};

use provreg_core::{Principal, ProductId, Timestamp};

use crate::product::NewProduct;

/// Ambient facts supplied by the host for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, now: Timestamp) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }
}

/// Command: bind the fee authority (set-once).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAuthorityContract {
    pub authority: Principal,
}

/// Command: overwrite the creation fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCreationFee {
    pub fee: u64,
}

/// Command: edit the mutable subset of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub max_quantity: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCommand {
    SetAuthorityContract(SetAuthorityContract),
    SetCreationFee(SetCreationFee),
    CreateProduct(NewProduct),
    UpdateProduct(UpdateProduct),
}
