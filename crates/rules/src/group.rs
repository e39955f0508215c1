use serde::{Deserialize, Serialize};

use shipquote_core::{
    DeliveryTimeRange, Entity, LocationId, Money, ShippingGroupId, ShippingMethodId,
    ShippingResult,
};
use shipquote_locations::LocationHierarchy;

/// Price and delivery time of one method for a set of locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingGroup {
    pub id: ShippingGroupId,
    pub method: ShippingMethodId,
    pub locations: Vec<LocationId>,
    /// Price of the first unit shipped in a group of line items.
    pub price: Money,
    /// Price of every further unit; the unit price when absent.
    #[serde(default)]
    pub additional_item_price: Option<Money>,
    pub delivery_time: DeliveryTimeRange,
}

impl ShippingGroup {
    pub fn new(
        id: ShippingGroupId,
        method: ShippingMethodId,
        locations: Vec<LocationId>,
        price: Money,
        delivery_time: DeliveryTimeRange,
    ) -> Self {
        Self {
            id,
            method,
            locations,
            price,
            additional_item_price: None,
            delivery_time,
        }
    }

    pub fn with_additional_item_price(mut self, price: Money) -> Self {
        self.additional_item_price = Some(price);
        self
    }

    pub fn incremental_price(&self) -> &Money {
        self.additional_item_price.as_ref().unwrap_or(&self.price)
    }

    pub fn is_bound_to(&self, location: LocationId) -> bool {
        self.locations.contains(&location)
    }

    /// True iff one of the bound locations contains `target`.
    pub fn is_in(&self, hierarchy: &LocationHierarchy, target: LocationId) -> ShippingResult<bool> {
        for &location in &self.locations {
            if hierarchy.contains_location(location, target)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Depth of the most specific bound location containing `target`.
    pub fn specificity_for(
        &self,
        hierarchy: &LocationHierarchy,
        target: LocationId,
    ) -> ShippingResult<Option<u32>> {
        let mut best = None;
        for &location in &self.locations {
            if hierarchy.contains_location(location, target)? {
                let depth = hierarchy.depth(location)?;
                best = Some(best.map_or(depth, |b: u32| b.max(depth)));
            }
        }
        Ok(best)
    }
}

impl Entity for ShippingGroup {
    type Id = ShippingGroupId;

    fn id(&self) -> ShippingGroupId {
        self.id
    }
}
