//! End-to-end scenarios over the catalog in `tests/fixtures/catalog.json`.
//!
//! Catalog → resolver → shipment → pricing engine → batch quotes.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use shipquote_core::{
    Currency, DayCount, DeliveryTimeRange, LocationId, Money, ProductId, PurchaseItemId,
    ShippingError, ShippingGroupId, ShippingId, ShippingMethodId, StaticRates,
};
use shipquote_infra::{EngineConfig, QuoteService, ShippingCatalog, bootstrap};
use shipquote_pricing::{PricingEngine, Product, PurchaseContext, PurchaseItem, Shipment, ShippingLineItem};
use shipquote_rules::{GroupResolver, Shipping, ShippingGroup};

const EUROPE: LocationId = LocationId::new(2);
const FRANCE: LocationId = LocationId::new(3);
const GERMANY: LocationId = LocationId::new(4);
const GREECE: LocationId = LocationId::new(6);
const AUSTRALIA: LocationId = LocationId::new(7);

const POST: ShippingMethodId = ShippingMethodId::new(1);
const COURIER: ShippingMethodId = ShippingMethodId::new(2);

const FROM_FRANCE: ShippingId = ShippingId::new(1);
const FROM_GERMANY: ShippingId = ShippingId::new(2);

fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.json")
}

fn config() -> EngineConfig {
    let path = catalog_path().display().to_string();
    EngineConfig::from_lookup(move |key| match key {
        "SHIPQUOTE_CATALOG" => Some(path.clone()),
        "SHIPQUOTE_RATES" => Some("EUR=1.2".to_string()),
        "SHIPQUOTE_DISCOUNT_THRESHOLD" => Some("50".to_string()),
        _ => None,
    })
    .unwrap()
}

fn gbp() -> Currency {
    Currency::new("GBP").unwrap()
}

fn money(amount: i64) -> Money {
    Money::new(Decimal::from(amount), gbp())
}

fn item(id: u64, shipping: Arc<Shipping>, quantity: u32) -> PurchaseItem {
    let product = Product::new(ProductId::new(id), format!("product-{id}"), money(20), shipping);
    PurchaseItem::new(PurchaseItemId::new(id), product, quantity).unwrap()
}

fn group_ids(groups: &[&ShippingGroup]) -> Vec<u64> {
    groups.iter().map(|g| g.id.get()).collect()
}

#[test]
fn resolution_prefers_the_most_specific_group() {
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = config().currency_rates().unwrap();
    let resolver = catalog.resolver(&rates);
    let shipping = catalog.shipping(FROM_FRANCE).unwrap();

    assert_eq!(
        group_ids(&resolver.groups_in(&shipping, FRANCE).unwrap()),
        vec![10, 11, 12, 13]
    );
    assert_eq!(
        group_ids(&resolver.groups_in(&shipping, AUSTRALIA).unwrap()),
        vec![13]
    );

    let post_to = |location| resolver.group_for(&shipping, location, POST).unwrap().map(|g| g.id);
    assert_eq!(post_to(FRANCE), Some(ShippingGroupId::new(12)));
    assert_eq!(post_to(GERMANY), Some(ShippingGroupId::new(10)));
    assert_eq!(post_to(AUSTRALIA), Some(ShippingGroupId::new(13)));
    assert_eq!(resolver.group_for(&shipping, AUSTRALIA, COURIER).unwrap(), None);

    assert_eq!(
        resolver.most_specific_location_containing(&shipping, GREECE).unwrap(),
        EUROPE
    );
    assert_eq!(
        resolver.groups_in(&shipping, LocationId::new(404)).unwrap_err(),
        ShippingError::UnknownLocation(LocationId::new(404))
    );
}

#[test]
fn cheapest_group_compares_in_the_reference_currency() {
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = config().currency_rates().unwrap();
    let resolver = catalog.resolver(&rates);
    let shipping = catalog.shipping(FROM_GERMANY).unwrap();

    let cheapest = resolver.cheapest_group_in(&shipping, GREECE).unwrap().unwrap();
    assert_eq!(cheapest.id, ShippingGroupId::new(20));
    assert_eq!(
        resolver.cheapest_group_in(&shipping, AUSTRALIA).unwrap().map(|g| g.id),
        Some(ShippingGroupId::new(21))
    );
}

#[test]
fn delivery_times_merge_and_include_processing() {
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = StaticRates::new(gbp());
    let resolver = catalog.resolver(&rates);
    let shipping = catalog.shipping(FROM_FRANCE).unwrap();

    assert_eq!(
        resolver.delivery_time_for(&shipping, FRANCE).unwrap(),
        Some(DeliveryTimeRange::new(7, 14))
    );
    assert_eq!(
        resolver.total_delivery_time_for(&shipping, FRANCE).unwrap(),
        Some(DeliveryTimeRange::new(8, 16))
    );
    assert_eq!(shipping.methods_group_key(), "1,2");
}

/// Germany, paid on 2013-01-01, purchase total 100 GBP:
///
/// | item | shipping    | qty | discounted | cheapest group        |
/// |------|-------------|-----|------------|-----------------------|
/// | 1    | from France | 2   | no         | 10: 10 GBP, then 5    |
/// | 2    | from France | 1   | yes        | 10                    |
/// | 3    | from Germany| 3   | no         | 20: 12 EUR, then 6    |
fn german_shipment<R: GroupResolver>(catalog: &ShippingCatalog, resolver: &R) -> Shipment {
    let from_france = catalog.shipping(FROM_FRANCE).unwrap();
    let from_germany = catalog.shipping(FROM_GERMANY).unwrap();
    let purchase_items = vec![
        item(1, from_france.clone(), 2),
        item(2, from_france, 1).with_discounted(true),
        item(3, from_germany, 3),
    ];

    let shipment = Shipment::new(
        PurchaseContext::new(gbp())
            .with_ship_to(GERMANY)
            .with_paid_at(NaiveDate::from_ymd_opt(2013, 1, 1).unwrap())
            .with_total_purchase_price(money(100)),
    );
    let items = shipment
        .build_items_from(&purchase_items, None, resolver)
        .unwrap();
    shipment.with_items(items)
}

#[test]
fn batch_quotes_are_isolated_per_shipment() {
    let config = config();
    let catalog = bootstrap(&config).unwrap();
    let rates = config.currency_rates().unwrap();
    let discounts = config.discount_policy().unwrap();
    let service = QuoteService::new(&catalog, &rates, discounts.as_ref());

    let priced = german_shipment(&catalog, &service.resolver());
    let unpriced = Shipment::new(PurchaseContext::new(gbp()).with_ship_to(GERMANY))
        .with_items(priced.items().to_vec());
    let empty = Shipment::new(PurchaseContext::new(gbp()).with_total_purchase_price(money(10)));

    let outcomes = service.quote_batch([&priced, &unpriced, &empty]);

    assert_eq!(outcomes.len(), 3);
    let quote = outcomes[0].result.as_ref().unwrap();
    // France/post: 10 + 5; Germany/post: 12 + 6·2 = 24 EUR = 20 GBP; item 2 ships free
    assert_eq!(quote.price, money(35));
    assert_eq!(quote.delivery_time, Some(DeliveryTimeRange::new(4, 9)));
    let dates = quote.shipping_dates.unwrap();
    assert_eq!(dates.from, NaiveDate::from_ymd_opt(2013, 1, 5).unwrap());
    assert_eq!(dates.to, NaiveDate::from_ymd_opt(2013, 1, 10).unwrap());

    assert_eq!(outcomes[1].shipment, unpriced.id());
    assert_eq!(
        outcomes[1].result.as_ref().unwrap_err(),
        &ShippingError::MissingPurchaseTotal
    );

    let nothing = outcomes[2].result.as_ref().unwrap();
    assert!(nothing.price.is_zero());
    assert_eq!(nothing.delivery_time, None);
    assert_eq!(nothing.shipping_dates, None);
}

#[test]
fn requoting_to_a_new_destination_reresolves_items() {
    let config = config();
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = config.currency_rates().unwrap();
    let discounts = config.discount_policy().unwrap();
    let service = QuoteService::new(&catalog, &rates, discounts.as_ref())
        .with_day_count(DayCount::Weekdays);

    let mut shipment = german_shipment(&catalog, &service.resolver());
    let quote = service.requote_to(&mut shipment, FRANCE).unwrap();

    // France/post now uses group 12: 4 + 2; Germany/post stays on 20 (24 EUR)
    assert_eq!(quote.price, money(26));
    assert_eq!(quote.delivery_time, Some(DeliveryTimeRange::new(4, 9)));
    assert_eq!(
        quote.shipping_dates.unwrap().to,
        NaiveDate::from_ymd_opt(2013, 1, 14).unwrap()
    );
    assert!(
        shipment
            .items()
            .iter()
            .all(|item| item.is_resolved_for(FRANCE))
    );

    let again = service.requote_to(&mut shipment, FRANCE).unwrap();
    assert_eq!(again, quote);
}

#[test]
fn pricing_by_another_method_leaves_the_shipment_alone() {
    let config = config();
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = config.currency_rates().unwrap();
    let discounts = config.discount_policy().unwrap();
    let service = QuoteService::new(&catalog, &rates, discounts.as_ref());
    let shipment = german_shipment(&catalog, &service.resolver());

    let engine = PricingEngine::new(&rates, discounts.as_ref());
    let purchase_items = vec![item(1, catalog.shipping(FROM_FRANCE).unwrap(), 2)];
    let by_courier = engine
        .compute_price_from(&shipment, &purchase_items, COURIER, &service.resolver())
        .unwrap();

    // courier has no incremental price: 15 · 2
    assert_eq!(by_courier, money(30));
    assert_eq!(engine.total_price(&shipment).unwrap(), money(35));
}

#[test]
fn unresolvable_items_are_left_out() {
    let catalog = ShippingCatalog::load(catalog_path()).unwrap();
    let rates = StaticRates::new(gbp());
    let resolver = catalog.resolver(&rates);
    let from_france = catalog.shipping(FROM_FRANCE).unwrap();

    let by_courier =
        Shipment::new_item_from(&item(1, from_france, 1), AUSTRALIA, Some(COURIER), &resolver)
            .unwrap();
    assert!(!by_courier.is_available());

    let shipment = Shipment::new(PurchaseContext::new(gbp()).with_total_purchase_price(money(1)))
        .with_items(vec![by_courier, ShippingLineItem::from_parts(None, None, None)]);
    assert_eq!(shipment.available_items().count(), 0);
    assert_eq!(
        shipment.total_delivery_time().unwrap_err(),
        ShippingError::EmptyRangeSet
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        ..ProptestConfig::default()
    })]

    /// Property: a batch yields one outcome per shipment, in order, and only
    /// shipments without a purchase total fail.
    #[test]
    fn batch_outcomes_follow_their_shipment(
        totals in prop::collection::vec(prop::option::of(1i64..500), 0..8)
    ) {
        let config = config();
        let catalog = ShippingCatalog::load(catalog_path()).unwrap();
        let rates = config.currency_rates().unwrap();
        let discounts = config.discount_policy().unwrap();
        let service = QuoteService::new(&catalog, &rates, discounts.as_ref());
        let template = german_shipment(&catalog, &service.resolver());

        let shipments: Vec<Shipment> = totals
            .iter()
            .map(|total| {
                let mut purchase = PurchaseContext::new(gbp()).with_ship_to(GERMANY);
                purchase.total_purchase_price = total.map(money);
                Shipment::new(purchase).with_items(template.items().to_vec())
            })
            .collect();

        let outcomes = service.quote_batch(&shipments);

        prop_assert_eq!(outcomes.len(), shipments.len());
        for ((outcome, shipment), total) in outcomes.iter().zip(&shipments).zip(&totals) {
            prop_assert_eq!(outcome.shipment, shipment.id());
            prop_assert_eq!(outcome.is_ok(), total.is_some());
        }
    }
}
