//! Shipment pricing (pure domain logic, no IO).
//!
//! A [`Shipment`] is the shipping record of one store purchase: one
//! [`ShippingLineItem`] per purchased item, each bound to the shipping group
//! resolved for the purchase's destination. The [`PricingEngine`] turns those
//! items into a single price, charging incremental rates for every unit after
//! the first one shipped together.

pub mod discount;
pub mod engine;
pub mod line_item;
pub mod purchase;
pub mod sellable;
pub mod shipment;

pub use discount::{DiscountPolicy, DiscountThreshold, NoDiscounts};
pub use engine::{PricedShipment, PricingEngine, relative_prices};
pub use line_item::{GroupKey, PricingLine, ShippingLineItem};
pub use purchase::{Product, PurchaseContext, PurchaseItem, total_payable};
pub use sellable::Sellable;
pub use shipment::{Shipment, total_shipping_date};

#[cfg(test)]
pub(crate) mod fixtures;
