//! `shipquote-core`: building blocks shared by the shipping engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, currency-aware money and day ranges.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod range;
pub mod value_object;

pub use entity::Entity;
pub use error::{ShippingError, ShippingResult};
pub use id::{
    LineItemId, LocationId, ProductId, PurchaseItemId, ShipmentId, ShippingGroupId, ShippingId,
    ShippingMethodId,
};
pub use money::{Currency, CurrencyConverter, Money, StaticRates};
pub use range::{DateRange, DayCount, DeliveryTimeRange};
pub use value_object::ValueObject;
