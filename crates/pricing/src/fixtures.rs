//! Reference data shared by the unit tests of this crate.

use std::sync::Arc;

use rust_decimal::Decimal;

use shipquote_core::{
    Currency, DeliveryTimeRange, LocationId, Money, ProductId, PurchaseItemId, ShippingGroupId,
    ShippingId, ShippingMethodId,
};
use shipquote_locations::{Location, LocationHierarchy, LocationKind};
use shipquote_rules::{Shipping, ShippingGroup};

use crate::purchase::{Product, PurchaseItem};

pub const EVERYWHERE: LocationId = LocationId::new(1);
pub const EUROPE: LocationId = LocationId::new(2);
pub const FRANCE: LocationId = LocationId::new(3);
pub const GERMANY: LocationId = LocationId::new(4);
pub const UNITED_KINGDOM: LocationId = LocationId::new(5);
pub const GREECE: LocationId = LocationId::new(6);
pub const AUSTRALIA: LocationId = LocationId::new(7);

pub const POST: ShippingMethodId = ShippingMethodId::new(1);
pub const COURIER: ShippingMethodId = ShippingMethodId::new(2);

pub fn world() -> LocationHierarchy {
    let country = |id, name, parent| Location::new(id, name, Some(parent), LocationKind::Country);
    LocationHierarchy::new(vec![
        Location::new(EVERYWHERE, "Everywhere", None, LocationKind::Everywhere),
        Location::new(EUROPE, "Europe", Some(EVERYWHERE), LocationKind::Continent),
        country(FRANCE, "France", EUROPE),
        country(GERMANY, "Germany", EUROPE),
        country(UNITED_KINGDOM, "United Kingdom", EUROPE),
        country(GREECE, "Greece", EUROPE),
        country(AUSTRALIA, "Australia", EVERYWHERE),
    ])
    .unwrap()
}

pub fn gbp() -> Currency {
    Currency::new("GBP").unwrap()
}

pub fn eur() -> Currency {
    Currency::new("EUR").unwrap()
}

pub fn money(amount: i64, currency: Currency) -> Money {
    Money::new(Decimal::from(amount), currency)
}

pub fn post_europe() -> ShippingGroupId {
    ShippingGroupId::new(1)
}

/// | group | method  | location   | price | additional | delivery |
/// |-------|---------|------------|-------|------------|----------|
/// | 1     | post    | Europe     | 10    | 5          | 3-5      |
/// | 2     | courier | Europe     | 15    | -          | 1-2      |
/// | 3     | post    | Everywhere | 25    | 20         | 7-14     |
pub fn shipping_from_france() -> Arc<Shipping> {
    let group = |id, method, location, price, additional: Option<i64>, min, max| ShippingGroup {
        additional_item_price: additional.map(|a| money(a, gbp())),
        ..ShippingGroup::new(
            ShippingGroupId::new(id),
            method,
            vec![location],
            money(price, gbp()),
            DeliveryTimeRange::new(min, max),
        )
    };
    Arc::new(
        Shipping::new(ShippingId::new(1), gbp(), FRANCE, DeliveryTimeRange::new(1, 2))
            .with_group(group(1, POST, EUROPE, 10, Some(5), 3, 5))
            .with_group(group(2, COURIER, EUROPE, 15, None, 1, 2))
            .with_group(group(3, POST, EVERYWHERE, 25, Some(20), 7, 14)),
    )
}

/// Single post group to Europe, shipped from Germany: 8 GBP, then 4; 2-3 days.
pub fn shipping_from_germany() -> Arc<Shipping> {
    Arc::new(
        Shipping::new(ShippingId::new(2), gbp(), GERMANY, DeliveryTimeRange::new(2, 6)).with_group(
            ShippingGroup::new(
                ShippingGroupId::new(11),
                POST,
                vec![EUROPE],
                money(8, gbp()),
                DeliveryTimeRange::new(2, 3),
            )
            .with_additional_item_price(money(4, gbp())),
        ),
    )
}

pub fn product(id: u64, price: i64, shipping: Arc<Shipping>) -> Product {
    Product::new(ProductId::new(id), format!("product-{id}"), money(price, gbp()), shipping)
}

pub fn purchase_item(id: u64, product: Product, quantity: u32) -> PurchaseItem {
    PurchaseItem::new(PurchaseItemId::new(id), product, quantity).unwrap()
}
