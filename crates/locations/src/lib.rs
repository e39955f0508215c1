//! Geographic containment hierarchy.
//!
//! Locations form a tree under a single root (`Everywhere`). Shipping rules
//! are attached to nodes of the tree and apply to everything underneath.

pub mod hierarchy;
pub mod location;

pub use hierarchy::LocationHierarchy;
pub use location::{Location, LocationKind};
