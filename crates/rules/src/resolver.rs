//! Selection of the shipping group that applies to a destination.

use tracing::{debug, warn};

use shipquote_core::{
    CurrencyConverter, LocationId, Money, ShippingError, ShippingMethodId, ShippingResult,
};
use shipquote_locations::LocationHierarchy;

use crate::group::ShippingGroup;
use crate::shipping::Shipping;

/// Group selection as seen by callers that assign groups to line items.
///
/// "No group ships there" is `Ok(None)`; errors are reserved for broken
/// reference data.
pub trait GroupResolver {
    fn resolve_group_for(
        &self,
        shipping: &Shipping,
        location: LocationId,
        method: ShippingMethodId,
    ) -> ShippingResult<Option<ShippingGroup>>;

    fn resolve_cheapest_group_in(
        &self,
        shipping: &Shipping,
        location: LocationId,
    ) -> ShippingResult<Option<ShippingGroup>>;
}

impl<T: GroupResolver + ?Sized> GroupResolver for &T {
    fn resolve_group_for(
        &self,
        shipping: &Shipping,
        location: LocationId,
        method: ShippingMethodId,
    ) -> ShippingResult<Option<ShippingGroup>> {
        (**self).resolve_group_for(shipping, location, method)
    }

    fn resolve_cheapest_group_in(
        &self,
        shipping: &Shipping,
        location: LocationId,
    ) -> ShippingResult<Option<ShippingGroup>> {
        (**self).resolve_cheapest_group_in(shipping, location)
    }
}

/// Resolves groups of a [`Shipping`] against a location hierarchy snapshot.
///
/// Prices in different currencies are compared after conversion to the
/// converter's reference currency.
#[derive(Debug)]
pub struct ShippingResolver<'a, C: ?Sized> {
    hierarchy: &'a LocationHierarchy,
    converter: &'a C,
}

impl<'a, C> ShippingResolver<'a, C>
where
    C: CurrencyConverter + ?Sized,
{
    pub fn new(hierarchy: &'a LocationHierarchy, converter: &'a C) -> Self {
        Self {
            hierarchy,
            converter,
        }
    }

    pub fn hierarchy(&self) -> &'a LocationHierarchy {
        self.hierarchy
    }

    /// True iff at least one group's locations contain `target`.
    pub fn ships_to(&self, shipping: &Shipping, target: LocationId) -> ShippingResult<bool> {
        Ok(!self.groups_in(shipping, target)?.is_empty())
    }

    /// Group locations of `shipping` that contain `target`, least specific first.
    pub fn locations_containing(
        &self,
        shipping: &Shipping,
        target: LocationId,
    ) -> ShippingResult<Vec<LocationId>> {
        let mut containing = Vec::new();
        for location in shipping.group_locations() {
            if self.hierarchy.contains_location(location, target)? {
                containing.push((self.hierarchy.depth(location)?, location));
            }
        }
        containing.sort_by_key(|&(depth, _)| depth);
        Ok(containing.into_iter().map(|(_, location)| location).collect())
    }

    /// The deepest group location of `shipping` containing `target`.
    pub fn most_specific_location_containing(
        &self,
        shipping: &Shipping,
        target: LocationId,
    ) -> ShippingResult<LocationId> {
        self.hierarchy
            .most_specific_containing(shipping.group_locations(), target)
    }

    /// All groups bound to a location containing `target`, in declaration order.
    pub fn groups_in<'s>(
        &self,
        shipping: &'s Shipping,
        target: LocationId,
    ) -> ShippingResult<Vec<&'s ShippingGroup>> {
        self.hierarchy.get(target)?;

        let mut groups = Vec::new();
        for group in &shipping.groups {
            if group.is_in(self.hierarchy, target)? {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// The group of `method` that applies to `target`.
    ///
    /// When several groups of the method apply, the one bound closest to
    /// `target` in the hierarchy wins; at equal depth the first declared wins.
    pub fn group_for<'s>(
        &self,
        shipping: &'s Shipping,
        target: LocationId,
        method: ShippingMethodId,
    ) -> ShippingResult<Option<&'s ShippingGroup>> {
        let mut best: Option<(&ShippingGroup, u32)> = None;
        let mut tied = false;

        for group in self.groups_in(shipping, target)? {
            if group.method != method {
                continue;
            }
            let Some(depth) = group.specificity_for(self.hierarchy, target)? else {
                continue;
            };
            match best {
                Some((_, best_depth)) if depth < best_depth => {}
                Some((_, best_depth)) if depth == best_depth => tied = true,
                _ => {
                    best = Some((group, depth));
                    tied = false;
                }
            }
        }

        if tied {
            if let Some((group, _)) = best {
                warn!(
                    shipping = %shipping.id,
                    method = %method,
                    location = %target,
                    group = %group.id,
                    "several shipping groups match at the same depth; using the first declared"
                );
            }
        }

        Ok(best.map(|(group, _)| group))
    }

    /// The applicable group with the lowest price in the reference currency.
    ///
    /// Equal prices keep the first group encountered.
    pub fn cheapest_group_in<'s>(
        &self,
        shipping: &'s Shipping,
        target: LocationId,
    ) -> ShippingResult<Option<&'s ShippingGroup>> {
        let reference = self.converter.reference_currency();

        let mut cheapest: Option<(&ShippingGroup, Money)> = None;
        for group in self.groups_in(shipping, target)? {
            let price = group.price.convert_to(reference, self.converter)?;
            let cheaper = match &cheapest {
                None => true,
                Some((_, best)) => price.amount() < best.amount(),
            };
            if cheaper {
                cheapest = Some((group, price));
            }
        }

        if let Some((group, price)) = &cheapest {
            debug!(
                shipping = %shipping.id,
                location = %target,
                group = %group.id,
                price = %price,
                "cheapest shipping group resolved"
            );
        }

        Ok(cheapest.map(|(group, _)| group))
    }

    /// Like [`Self::group_for`], failing when no group of `method` applies.
    pub fn require_group_for<'s>(
        &self,
        shipping: &'s Shipping,
        target: LocationId,
        method: ShippingMethodId,
    ) -> ShippingResult<&'s ShippingGroup> {
        self.group_for(shipping, target, method)?
            .ok_or(ShippingError::NotFound(target))
    }
}

impl<C> GroupResolver for ShippingResolver<'_, C>
where
    C: CurrencyConverter + ?Sized,
{
    fn resolve_group_for(
        &self,
        shipping: &Shipping,
        location: LocationId,
        method: ShippingMethodId,
    ) -> ShippingResult<Option<ShippingGroup>> {
        Ok(self.group_for(shipping, location, method)?.cloned())
    }

    fn resolve_cheapest_group_in(
        &self,
        shipping: &Shipping,
        location: LocationId,
    ) -> ShippingResult<Option<ShippingGroup>> {
        Ok(self.cheapest_group_in(shipping, location)?.cloned())
    }
}
