//! Reference data shared by the unit tests of this crate.
//!
//! ```text
//! Everywhere
//! ├── Europe ── France, Germany, United Kingdom, Turkey
//! ├── Australia
//! └── Russia
//! ```

use rust_decimal::Decimal;

use shipquote_core::{
    Currency, DeliveryTimeRange, LocationId, Money, ShippingGroupId, ShippingId, ShippingMethodId,
};
use shipquote_locations::{Location, LocationHierarchy, LocationKind};

use crate::group::ShippingGroup;
use crate::shipping::Shipping;

pub const EVERYWHERE: LocationId = LocationId::new(1);
pub const EUROPE: LocationId = LocationId::new(2);
pub const FRANCE: LocationId = LocationId::new(3);
pub const GERMANY: LocationId = LocationId::new(4);
pub const UNITED_KINGDOM: LocationId = LocationId::new(5);
pub const TURKEY: LocationId = LocationId::new(6);
pub const AUSTRALIA: LocationId = LocationId::new(7);
pub const RUSSIA: LocationId = LocationId::new(8);

pub const POST: ShippingMethodId = ShippingMethodId::new(1);
pub const COURIER: ShippingMethodId = ShippingMethodId::new(2);
pub const EXPRESS: ShippingMethodId = ShippingMethodId::new(3);

pub fn world() -> LocationHierarchy {
    let country = |id, name, parent| Location::new(id, name, Some(parent), LocationKind::Country);
    LocationHierarchy::new(vec![
        Location::new(EVERYWHERE, "Everywhere", None, LocationKind::Everywhere),
        Location::new(EUROPE, "Europe", Some(EVERYWHERE), LocationKind::Continent),
        country(FRANCE, "France", EUROPE),
        country(GERMANY, "Germany", EUROPE),
        country(UNITED_KINGDOM, "United Kingdom", EUROPE),
        country(TURKEY, "Turkey", EUROPE),
        country(AUSTRALIA, "Australia", EVERYWHERE),
        country(RUSSIA, "Russia", EVERYWHERE),
    ])
    .unwrap()
}

pub fn gbp() -> Currency {
    Currency::new("GBP").unwrap()
}

pub fn usd() -> Currency {
    Currency::new("USD").unwrap()
}

pub fn money(amount: i64, currency: Currency) -> Money {
    Money::new(Decimal::from(amount), currency)
}

pub fn group(
    id: u64,
    method: ShippingMethodId,
    locations: &[LocationId],
    price: i64,
) -> ShippingGroup {
    ShippingGroup::new(
        ShippingGroupId::new(id),
        method,
        locations.to_vec(),
        money(price, gbp()),
        DeliveryTimeRange::new(2, 4),
    )
}

/// | group | method  | location  | price | delivery |
/// |-------|---------|-----------|-------|----------|
/// | 1     | post    | Australia | 20    | 10-20    |
/// | 2     | courier | Europe    | 15    | 3-5      |
/// | 3     | post    | Europe    | 10    | 5-8      |
/// | 4     | express | France    | 30    | 1-2      |
/// | 5     | post    | France    | 8     | 2-4      |
pub fn shipping() -> Shipping {
    let timed = |g: ShippingGroup, min, max| ShippingGroup {
        delivery_time: DeliveryTimeRange::new(min, max),
        ..g
    };
    Shipping::new(ShippingId::new(1), gbp(), FRANCE, DeliveryTimeRange::new(3, 5))
        .with_group(timed(group(1, POST, &[AUSTRALIA], 20), 10, 20))
        .with_group(timed(group(2, COURIER, &[EUROPE], 15), 3, 5))
        .with_group(timed(group(3, POST, &[EUROPE], 10), 5, 8))
        .with_group(timed(group(4, EXPRESS, &[FRANCE], 30), 1, 2))
        .with_group(timed(group(5, POST, &[FRANCE], 8), 2, 4))
}
