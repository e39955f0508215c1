//! Shipping line items: one purchased item bound to its resolved group.

use serde::{Deserialize, Serialize};

use shipquote_core::{
    DeliveryTimeRange, LineItemId, LocationId, Money, ShippingMethodId, ShippingResult,
};
use shipquote_rules::{Shipping, ShippingGroup};

use crate::purchase::PurchaseItem;

/// Clusters line items that ship together: same method, same origin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(method: ShippingMethodId, ships_from: LocationId) -> Self {
        Self(format!("{method}-{ships_from}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl core::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The figures of one line item that go into the shipment price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingLine {
    pub group_key: GroupKey,
    pub unit_price: Money,
    pub additional_item_price: Money,
    pub quantity: u32,
    pub is_discounted: bool,
}

impl PricingLine {
    /// First unit at the unit price, the rest at the incremental price.
    pub fn total_price(&self) -> ShippingResult<Money> {
        let rest = self
            .additional_item_price
            .times(self.quantity.saturating_sub(1))?;
        self.unit_price.checked_add(&rest)
    }

    /// Every unit at the incremental price.
    pub fn additional_price(&self) -> ShippingResult<Money> {
        self.additional_item_price.times(self.quantity)
    }
}

/// Shipment record of one purchased item.
///
/// A line item is *available* for pricing and delivery estimates only when
/// it has both a purchase item and a resolved group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingLineItem {
    id: LineItemId,
    purchase_item: Option<PurchaseItem>,
    group: Option<ShippingGroup>,
    resolved_for: Option<LocationId>,
}

impl ShippingLineItem {
    /// Line item whose group was resolved for `location`.
    pub fn resolved(
        purchase_item: PurchaseItem,
        group: Option<ShippingGroup>,
        location: LocationId,
    ) -> Self {
        Self::from_parts(Some(purchase_item), group, Some(location))
    }

    /// Line item as loaded from storage; any part may be missing.
    pub fn from_parts(
        purchase_item: Option<PurchaseItem>,
        group: Option<ShippingGroup>,
        resolved_for: Option<LocationId>,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            purchase_item,
            group,
            resolved_for,
        }
    }

    pub fn with_id(mut self, id: LineItemId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn purchase_item(&self) -> Option<&PurchaseItem> {
        self.purchase_item.as_ref()
    }

    pub fn group(&self) -> Option<&ShippingGroup> {
        self.group.as_ref()
    }

    pub fn resolved_for(&self) -> Option<LocationId> {
        self.resolved_for
    }

    pub fn shipping(&self) -> Option<&Shipping> {
        self.purchase_item.as_ref().map(PurchaseItem::shipping)
    }

    pub fn is_available(&self) -> bool {
        self.purchase_item.is_some() && self.group.is_some()
    }

    pub fn quantity(&self) -> u32 {
        self.purchase_item.as_ref().map_or(0, PurchaseItem::quantity)
    }

    pub fn is_discounted(&self) -> bool {
        self.purchase_item
            .as_ref()
            .is_some_and(PurchaseItem::is_discounted)
    }

    /// Whether the current group already reflects `location`.
    ///
    /// Items loaded without a recorded destination count as resolved for the
    /// locations their group is bound to. An item resolved for `location`
    /// that found no group stays resolved, so relocating to the same place
    /// again does not query the resolver a second time.
    pub fn is_resolved_for(&self, location: LocationId) -> bool {
        match self.resolved_for {
            Some(resolved) => resolved == location,
            None => self.group.as_ref().is_some_and(|g| g.is_bound_to(location)),
        }
    }

    pub fn group_key(&self) -> Option<GroupKey> {
        let group = self.group.as_ref()?;
        let shipping = self.shipping()?;
        Some(GroupKey::new(group.method, shipping.ships_from))
    }

    pub fn price(&self) -> Option<&Money> {
        self.group.as_ref().map(|g| &g.price)
    }

    pub fn additional_item_price(&self) -> Option<&Money> {
        self.group.as_ref().map(ShippingGroup::incremental_price)
    }

    /// Group delivery time plus the configuration's processing time.
    pub fn total_delivery_time(&self) -> Option<DeliveryTimeRange> {
        let group = self.group.as_ref()?;
        let shipping = self.shipping()?;
        Some(shipping.processing_time.offset_by(&group.delivery_time))
    }

    pub fn pricing_line(&self) -> Option<PricingLine> {
        let group = self.group.as_ref()?;
        let purchase_item = self.purchase_item.as_ref()?;
        Some(PricingLine {
            group_key: GroupKey::new(group.method, purchase_item.shipping().ships_from),
            unit_price: group.price.clone(),
            additional_item_price: group.incremental_price().clone(),
            quantity: purchase_item.quantity(),
            is_discounted: purchase_item.is_discounted(),
        })
    }

    pub(crate) fn reassign(&mut self, group: Option<ShippingGroup>, location: LocationId) {
        self.group = group;
        self.resolved_for = Some(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn group_key_combines_method_and_origin() {
        let shipping = shipping_from_france();
        let item = ShippingLineItem::resolved(
            purchase_item(1, product(1, 10, shipping.clone()), 1),
            shipping.group(post_europe()).cloned(),
            GERMANY,
        );
        assert_eq!(item.group_key(), Some(GroupKey::from("1-3")));
    }

    #[test]
    fn unresolved_items_are_unavailable() {
        let shipping = shipping_from_france();
        let item = ShippingLineItem::from_parts(
            Some(purchase_item(1, product(1, 10, shipping), 1)),
            None,
            None,
        );
        assert!(!item.is_available());
        assert_eq!(item.group_key(), None);
        assert_eq!(item.pricing_line(), None);
        assert_eq!(item.total_delivery_time(), None);
    }

    #[test]
    fn total_delivery_time_includes_processing() {
        let shipping = shipping_from_france();
        let item = ShippingLineItem::resolved(
            purchase_item(1, product(1, 10, shipping.clone()), 1),
            shipping.group(post_europe()).cloned(),
            GERMANY,
        );
        // processing (1, 2) + post to Europe (3, 5)
        assert_eq!(item.total_delivery_time(), Some(DeliveryTimeRange::new(4, 7)));
    }

    #[test]
    fn resolution_is_tracked_per_destination() {
        let shipping = shipping_from_france();
        let loaded = ShippingLineItem::from_parts(
            Some(purchase_item(1, product(1, 10, shipping.clone()), 1)),
            shipping.group(post_europe()).cloned(),
            None,
        );
        assert!(loaded.is_resolved_for(EUROPE));
        assert!(!loaded.is_resolved_for(GERMANY));

        let resolved = ShippingLineItem::resolved(
            purchase_item(2, product(2, 10, shipping.clone()), 1),
            shipping.group(post_europe()).cloned(),
            GERMANY,
        );
        assert!(resolved.is_resolved_for(GERMANY));
        assert!(!resolved.is_resolved_for(EUROPE));
    }

    #[test]
    fn pricing_line_prices_units_incrementally() {
        let line = PricingLine {
            group_key: GroupKey::from("g"),
            unit_price: money(25, eur()),
            additional_item_price: money(12, eur()),
            quantity: 5,
            is_discounted: false,
        };
        assert_eq!(line.total_price().unwrap(), money(25 + 12 * 4, eur()));
        assert_eq!(line.additional_price().unwrap(), money(12 * 5, eur()));
    }
}
