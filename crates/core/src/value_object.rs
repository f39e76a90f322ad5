//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A content
/// hash is a value object; a product record is an entity (it has a `ProductId`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
