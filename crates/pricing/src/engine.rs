//! Price aggregation for shipments.
//!
//! ```text
//! line items
//!   ↓ available (purchase item + resolved group)
//!   ↓ drop discounted items, if the discount policy accepts the purchase total
//!   ↓ group by (method, origin)
//!   ↓ per group: one base unit at unit price, everything else incremental
//!   ↓ sum per group (group currency), then across groups (purchase currency)
//! price
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use shipquote_core::{
    CurrencyConverter, Money, ShippingError, ShippingMethodId, ShippingResult,
};
use shipquote_rules::GroupResolver;

use crate::discount::DiscountPolicy;
use crate::line_item::{GroupKey, PricingLine, ShippingLineItem};
use crate::purchase::PurchaseItem;
use crate::sellable::Sellable;
use crate::shipment::Shipment;

/// Prices shipments with an injected currency service and discount rule.
#[derive(Debug)]
pub struct PricingEngine<'a, C: ?Sized, D: ?Sized> {
    converter: &'a C,
    discounts: &'a D,
}

impl<'a, C, D> PricingEngine<'a, C, D>
where
    C: CurrencyConverter + ?Sized,
    D: DiscountPolicy + ?Sized,
{
    pub fn new(converter: &'a C, discounts: &'a D) -> Self {
        Self {
            converter,
            discounts,
        }
    }

    /// Lines that are charged for, given the purchase total.
    pub fn filter_discounted<'l>(&self, lines: &'l [PricingLine], total: &Money) -> Vec<&'l PricingLine> {
        if !self.discounts.is_eligible_for_discount_filtering(total) {
            return lines.iter().collect();
        }
        lines.iter().filter(|line| !line.is_discounted).collect()
    }

    /// Aggregate shipping price of `lines`, in the currency of `total`.
    ///
    /// Pure: nothing is mutated, whether or not the computation fails.
    pub fn compute_price(&self, lines: &[PricingLine], total: Option<&Money>) -> ShippingResult<Money> {
        let total = total.ok_or(ShippingError::MissingPurchaseTotal)?;
        let target = total.currency();

        let charged = self.filter_discounted(lines, total);

        let mut groups: BTreeMap<&GroupKey, Vec<&PricingLine>> = BTreeMap::new();
        for line in charged {
            groups.entry(&line.group_key).or_default().push(line);
        }

        let mut group_totals = Vec::with_capacity(groups.len());
        for (key, lines) in &groups {
            let prices = relative_prices(lines)?;
            let currency = prices[0].currency();
            let group_total = Money::sum_same_currency(&prices, currency)?;
            debug!(group = %key, lines = lines.len(), total = %group_total, "priced shipping group");
            group_totals.push(group_total);
        }

        Money::sum(&group_totals, target, self.converter)
    }

    /// [`Self::compute_price`] over the available line items.
    pub fn price_items<'i, I>(&self, items: I, total: Option<&Money>) -> ShippingResult<Money>
    where
        I: IntoIterator<Item = &'i ShippingLineItem>,
    {
        let lines: Vec<PricingLine> = items
            .into_iter()
            .filter_map(ShippingLineItem::pricing_line)
            .collect();
        self.compute_price(&lines, total)
    }

    /// Price of the shipment's available items against its own purchase total.
    pub fn total_price(&self, shipment: &Shipment) -> ShippingResult<Money> {
        self.price_items(
            shipment.available_items(),
            shipment.purchase().total_purchase_price.as_ref(),
        )
    }

    /// What the shipment would cost if `purchase_items` shipped by `method`
    /// to its destination. The shipment itself is not changed.
    pub fn compute_price_from<R>(
        &self,
        shipment: &Shipment,
        purchase_items: &[PurchaseItem],
        method: ShippingMethodId,
        resolver: &R,
    ) -> ShippingResult<Money>
    where
        R: GroupResolver + ?Sized,
    {
        let location = shipment.ship_to()?;
        let items = Shipment::new_items_from(purchase_items, location, Some(method), resolver)?;
        self.price_items(
            items.iter().filter(|item| item.is_available()),
            shipment.purchase().total_purchase_price.as_ref(),
        )
    }

    /// Bind a shipment to this engine so it can be sold as a purchase item.
    pub fn priced<'s>(&'s self, shipment: &'s Shipment) -> PricedShipment<'s, 'a, C, D> {
        PricedShipment {
            engine: self,
            shipment,
        }
    }
}

/// Per-line prices within one group.
///
/// The line with the highest unit price (the first of them on ties) is the
/// base line: its first unit is charged the unit price and its remaining
/// units the incremental price. All units of every other line are charged
/// the incremental price. All figures must share one currency.
pub fn relative_prices(lines: &[&PricingLine]) -> ShippingResult<Vec<Money>> {
    let Some(first) = lines.first() else {
        return Ok(Vec::new());
    };
    let currency = first.unit_price.currency();
    for line in lines {
        if line.unit_price.currency() != currency {
            return Err(ShippingError::currency_mismatch(
                currency,
                line.unit_price.currency(),
            ));
        }
        if line.additional_item_price.currency() != currency {
            return Err(ShippingError::currency_mismatch(
                currency,
                line.additional_item_price.currency(),
            ));
        }
    }

    let mut base = 0;
    for (i, line) in lines.iter().enumerate().skip(1) {
        if line.unit_price.amount() > lines[base].unit_price.amount() {
            base = i;
        }
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == base {
                line.total_price()
            } else {
                line.additional_price()
            }
        })
        .collect()
}

/// A shipment sold through the purchase: its price is the shipment total.
#[derive(Debug)]
pub struct PricedShipment<'s, 'a, C: ?Sized, D: ?Sized> {
    engine: &'s PricingEngine<'a, C, D>,
    shipment: &'s Shipment,
}

impl<C, D> Sellable for PricedShipment<'_, '_, C, D>
where
    C: CurrencyConverter + ?Sized,
    D: DiscountPolicy + ?Sized,
{
    fn price_for_purchase_item(&self, _item: &PurchaseItem) -> ShippingResult<Money> {
        self.engine.total_price(self.shipment)
    }
}
