//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity; two values with the same attributes are the
/// same value. A stock status classification is one: `Critical` derived from
/// quantity 10 and from quantity 40 are indistinguishable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
