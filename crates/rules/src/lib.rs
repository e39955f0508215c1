//! Shipping rules: methods, groups, per-product shipping configurations, and
//! the resolver that picks the group applying to a destination.
//!
//! Everything here is read-only reference data plus pure lookups over it
//! (no IO, no storage).

pub mod delivery;
pub mod group;
pub mod method;
pub mod resolver;
pub mod shipping;

pub use group::ShippingGroup;
pub use method::ShippingMethod;
pub use resolver::{GroupResolver, ShippingResolver};
pub use shipping::Shipping;

#[cfg(test)]
pub(crate) mod fixtures;
