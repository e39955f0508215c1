use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use shipquote_core::{
    Currency, DeliveryTimeRange, Entity, LocationId, ShippingError, ShippingGroupId, ShippingId,
    ShippingResult,
};

use crate::group::ShippingGroup;

/// Shipping configuration of a sellable: where it ships from, how long it
/// takes to prepare, and the groups it ships through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub id: ShippingId,
    pub currency: Currency,
    pub ships_from: LocationId,
    pub processing_time: DeliveryTimeRange,
    #[serde(default)]
    pub groups: Vec<ShippingGroup>,
}

impl Shipping {
    pub fn new(
        id: ShippingId,
        currency: Currency,
        ships_from: LocationId,
        processing_time: DeliveryTimeRange,
    ) -> Self {
        Self {
            id,
            currency,
            ships_from,
            processing_time,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: ShippingGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn group(&self, id: ShippingGroupId) -> Option<&ShippingGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Sorted, comma-joined ids of every method the groups use.
    ///
    /// Two configurations with the same key offer the same set of methods.
    pub fn methods_group_key(&self) -> String {
        self.groups
            .iter()
            .map(|g| g.method)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Every location some group is bound to, first occurrence order.
    pub fn group_locations(&self) -> Vec<LocationId> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|g| g.locations.iter().copied())
            .filter(|l| seen.insert(*l))
            .collect()
    }

    /// Rejects configurations in which two groups bind the same method to
    /// the same location, since neither could be preferred over the other.
    pub fn ensure_unambiguous(&self) -> ShippingResult<()> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            for &location in &group.locations {
                if !seen.insert((group.method, location)) {
                    return Err(ShippingError::AmbiguousGroupMatch {
                        method: group.method,
                        location,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Entity for Shipping {
    type Id = ShippingId;

    fn id(&self) -> ShippingId {
        self.id
    }
}
