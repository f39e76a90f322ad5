//! Product registry domain.
//!
//! Pure, deterministic business rules for registering supply-chain products:
//! validation, uniqueness, creator-only edits and the creation fee. No IO; the
//! clock, authority verifier and fee settlement are supplied by the caller.

pub mod command;
pub mod config;
pub mod event;
pub mod product;
pub mod registry;
pub mod settlement;
pub mod validation;

pub use command::{CallContext, RegistryCommand, SetAuthorityContract, SetCreationFee, UpdateProduct};
pub use config::{DEFAULT_CREATION_FEE, DEFAULT_MAX_PRODUCTS, RegistryConfig};
pub use event::{
    AuthorityContractBound, CreationFeeChanged, ProductCreated, ProductUpdated, RegistryEvent,
};
pub use product::{ContentHash, Currency, HASH_LEN, NewProduct, Product, ProductType, ProductUpdate};
pub use registry::ProductRegistry;
pub use settlement::FeeSettlement;
