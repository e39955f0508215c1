//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and never change once built. Two
/// `Money { 18, GBP }` values are the same price; two delivery ranges
/// `(3, 5)` are the same estimate. Snapshots of reference data handed to the
/// engine are compared the same way.
///
/// ```ignore
/// let a = DeliveryTimeRange::new(3, 5);
/// let b = DeliveryTimeRange::new(3, 5);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
