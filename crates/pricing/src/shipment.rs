//! Shipments: the shipping record of one store purchase.

use chrono::NaiveDate;
use tracing::{debug, info};

use shipquote_core::{
    Currency, DateRange, DayCount, DeliveryTimeRange, LocationId, Money, PurchaseItemId,
    ShipmentId, ShippingError, ShippingMethodId, ShippingResult, entity,
};
use shipquote_rules::GroupResolver;

use crate::line_item::ShippingLineItem;
use crate::purchase::{PurchaseContext, PurchaseItem};

/// Line items of one purchase plus what the purchase says about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    id: ShipmentId,
    purchase: PurchaseContext,
    items: Vec<ShippingLineItem>,
}

impl Shipment {
    pub fn new(purchase: PurchaseContext) -> Self {
        Self {
            id: ShipmentId::new(),
            purchase,
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ShipmentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_items(mut self, items: Vec<ShippingLineItem>) -> Self {
        self.items = items;
        self
    }

    pub fn id(&self) -> ShipmentId {
        self.id
    }

    pub fn purchase(&self) -> &PurchaseContext {
        &self.purchase
    }

    pub fn items(&self) -> &[ShippingLineItem] {
        &self.items
    }

    pub fn add_item(&mut self, item: ShippingLineItem) {
        self.items.push(item);
    }

    /// Items with both a purchase item and a resolved group.
    pub fn available_items(&self) -> impl Iterator<Item = &ShippingLineItem> {
        self.items.iter().filter(|item| item.is_available())
    }

    /// Items whose purchase item is one of `ids`, in shipment order.
    pub fn items_from(&self, ids: &[PurchaseItemId]) -> Vec<&ShippingLineItem> {
        self.items
            .iter()
            .filter(|item| item.purchase_item().is_some_and(|pi| ids.contains(&pi.id())))
            .collect()
    }

    pub fn purchase_item_ids(&self) -> Vec<PurchaseItemId> {
        entity::ids(self.items.iter().filter_map(ShippingLineItem::purchase_item))
    }

    pub fn ship_to(&self) -> ShippingResult<LocationId> {
        self.purchase.ship_to.ok_or(ShippingError::MissingDestination)
    }

    pub fn currency(&self) -> &Currency {
        &self.purchase.currency
    }

    pub fn paid_at(&self) -> Option<NaiveDate> {
        self.purchase.paid_at
    }

    pub fn total_purchase_price(&self) -> ShippingResult<&Money> {
        self.purchase
            .total_purchase_price
            .as_ref()
            .ok_or(ShippingError::MissingPurchaseTotal)
    }

    /// Merge of the total delivery times of the available items.
    pub fn total_delivery_time(&self) -> ShippingResult<DeliveryTimeRange> {
        DeliveryTimeRange::merge(
            self.available_items()
                .filter_map(ShippingLineItem::total_delivery_time),
        )
    }

    /// Dates between which the shipment should arrive, counted from payment.
    pub fn total_shipping_date(&self, counting: DayCount) -> ShippingResult<DateRange> {
        total_shipping_date(self.paid_at(), &self.total_delivery_time()?, counting)
    }

    /// Line item for `purchase_item` shipped to `location`.
    ///
    /// With a method the group of that method is used, otherwise the
    /// cheapest group shipping there. No applicable group leaves the item
    /// unresolved.
    pub fn new_item_from<R>(
        purchase_item: &PurchaseItem,
        location: LocationId,
        method: Option<ShippingMethodId>,
        resolver: &R,
    ) -> ShippingResult<ShippingLineItem>
    where
        R: GroupResolver + ?Sized,
    {
        let shipping = purchase_item.shipping();
        let group = match method {
            Some(method) => resolver.resolve_group_for(shipping, location, method)?,
            None => resolver.resolve_cheapest_group_in(shipping, location)?,
        };
        if group.is_none() {
            debug!(
                purchase_item = %purchase_item.id(),
                shipping = %shipping.id,
                location = %location,
                "no shipping group applies"
            );
        }
        Ok(ShippingLineItem::resolved(purchase_item.clone(), group, location))
    }

    pub fn new_items_from<R>(
        purchase_items: &[PurchaseItem],
        location: LocationId,
        method: Option<ShippingMethodId>,
        resolver: &R,
    ) -> ShippingResult<Vec<ShippingLineItem>>
    where
        R: GroupResolver + ?Sized,
    {
        purchase_items
            .iter()
            .map(|purchase_item| Self::new_item_from(purchase_item, location, method, resolver))
            .collect()
    }

    /// [`Self::new_item_from`] for this shipment's destination.
    pub fn build_item_from<R>(
        &self,
        purchase_item: &PurchaseItem,
        method: Option<ShippingMethodId>,
        resolver: &R,
    ) -> ShippingResult<ShippingLineItem>
    where
        R: GroupResolver + ?Sized,
    {
        Self::new_item_from(purchase_item, self.ship_to()?, method, resolver)
    }

    pub fn build_items_from<R>(
        &self,
        purchase_items: &[PurchaseItem],
        method: Option<ShippingMethodId>,
        resolver: &R,
    ) -> ShippingResult<Vec<ShippingLineItem>>
    where
        R: GroupResolver + ?Sized,
    {
        Self::new_items_from(purchase_items, self.ship_to()?, method, resolver)
    }

    /// Re-resolve, to the cheapest group shipping to `location`, every item
    /// not already resolved for it. Returns the number of items changed.
    ///
    /// All resolutions happen before any item is changed; on error the
    /// shipment is left as it was.
    pub fn update_items_location<R>(
        &mut self,
        location: LocationId,
        resolver: &R,
    ) -> ShippingResult<usize>
    where
        R: GroupResolver + ?Sized,
    {
        let mut updates = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.is_resolved_for(location) {
                continue;
            }
            let Some(purchase_item) = item.purchase_item() else {
                debug!(shipment = %self.id, item = %item.id(), "line item has no purchase item");
                continue;
            };
            let group = resolver.resolve_cheapest_group_in(purchase_item.shipping(), location)?;
            updates.push((index, group));
        }

        let changed = updates.len();
        for (index, group) in updates {
            self.items[index].reassign(group, location);
        }

        info!(shipment = %self.id, location = %location, changed, "line items relocated");
        Ok(changed)
    }
}

/// Project `delivery` onto the calendar from the payment date.
pub fn total_shipping_date(
    paid_at: Option<NaiveDate>,
    delivery: &DeliveryTimeRange,
    counting: DayCount,
) -> ShippingResult<DateRange> {
    let paid_at = paid_at.ok_or(ShippingError::MissingPaidDate)?;
    delivery.dates_from(paid_at, counting)
}
