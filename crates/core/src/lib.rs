//! `provreg-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, Timestamp};
pub use entity::Entity;
pub use error::{InvalidField, RegistryError, RegistryResult, SettlementError};
pub use id::{Principal, ProductId};
pub use value_object::ValueObject;
