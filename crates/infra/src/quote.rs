//! Batch quoting of shipments.
//!
//! Every shipment is quoted on its own: a failure is logged, reported for
//! that shipment, and does not affect the others.

use serde::Serialize;
use tracing::{info, warn};

use shipquote_core::{
    CurrencyConverter, DateRange, DayCount, DeliveryTimeRange, LocationId, Money, ShipmentId,
    ShippingError, ShippingResult,
};
use shipquote_pricing::{DiscountPolicy, PricingEngine, Shipment};
use shipquote_rules::ShippingResolver;

use crate::catalog::ShippingCatalog;

/// Price and timing of one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentQuote {
    pub shipment: ShipmentId,
    pub price: Money,
    /// `None` when no item is resolved yet.
    pub delivery_time: Option<DeliveryTimeRange>,
    /// `None` until the purchase is paid.
    pub shipping_dates: Option<DateRange>,
}

/// Outcome for one shipment of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteOutcome {
    pub shipment: ShipmentId,
    pub result: ShippingResult<ShipmentQuote>,
}

impl QuoteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct QuoteService<'a, C: ?Sized, D: ?Sized> {
    catalog: &'a ShippingCatalog,
    converter: &'a C,
    discounts: &'a D,
    day_count: DayCount,
}

impl<'a, C, D> QuoteService<'a, C, D>
where
    C: CurrencyConverter + ?Sized,
    D: DiscountPolicy + ?Sized,
{
    pub fn new(catalog: &'a ShippingCatalog, converter: &'a C, discounts: &'a D) -> Self {
        Self {
            catalog,
            converter,
            discounts,
            day_count: DayCount::default(),
        }
    }

    pub fn with_day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }

    pub fn resolver(&self) -> ShippingResolver<'a, C> {
        self.catalog.resolver(self.converter)
    }

    pub fn quote(&self, shipment: &Shipment) -> ShippingResult<ShipmentQuote> {
        let engine = PricingEngine::new(self.converter, self.discounts);
        let price = engine.total_price(shipment)?;

        let delivery_time = match shipment.total_delivery_time() {
            Ok(range) => Some(range),
            Err(ShippingError::EmptyRangeSet) => None,
            Err(err) => return Err(err),
        };
        let shipping_dates = match (delivery_time, shipment.paid_at()) {
            (Some(delivery), Some(paid_at)) => {
                Some(delivery.dates_from(paid_at, self.day_count)?)
            }
            _ => None,
        };

        Ok(ShipmentQuote {
            shipment: shipment.id(),
            price: price.rounded(),
            delivery_time,
            shipping_dates,
        })
    }

    /// Quote every shipment; one outcome per shipment, in input order.
    pub fn quote_batch<'s, I>(&self, shipments: I) -> Vec<QuoteOutcome>
    where
        I: IntoIterator<Item = &'s Shipment>,
    {
        let outcomes: Vec<QuoteOutcome> = shipments
            .into_iter()
            .map(|shipment| {
                let result = self.quote(shipment);
                if let Err(err) = &result {
                    warn!(shipment = %shipment.id(), error = %err, "shipment could not be quoted");
                }
                QuoteOutcome {
                    shipment: shipment.id(),
                    result,
                }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(
            shipments = outcomes.len(),
            quoted = outcomes.len() - failed,
            failed,
            "batch quoted"
        );
        outcomes
    }

    /// Move the shipment to `location`, then quote it.
    pub fn requote_to(
        &self,
        shipment: &mut Shipment,
        location: LocationId,
    ) -> ShippingResult<ShipmentQuote> {
        shipment.update_items_location(location, &self.resolver())?;
        self.quote(shipment)
    }
}
