//! Delivery time estimates for a destination.

use shipquote_core::{CurrencyConverter, DeliveryTimeRange, LocationId, ShippingResult};

use crate::resolver::ShippingResolver;
use crate::shipping::Shipping;

impl<C> ShippingResolver<'_, C>
where
    C: CurrencyConverter + ?Sized,
{
    /// Merge of the delivery times of every group applying to `target`;
    /// `None` when nothing ships there.
    pub fn delivery_time_for(
        &self,
        shipping: &Shipping,
        target: LocationId,
    ) -> ShippingResult<Option<DeliveryTimeRange>> {
        let groups = self.groups_in(shipping, target)?;
        if groups.is_empty() {
            return Ok(None);
        }
        DeliveryTimeRange::merge(groups.iter().map(|g| g.delivery_time)).map(Some)
    }

    /// Delivery time plus the configuration's processing time.
    pub fn total_delivery_time_for(
        &self,
        shipping: &Shipping,
        target: LocationId,
    ) -> ShippingResult<Option<DeliveryTimeRange>> {
        Ok(self
            .delivery_time_for(shipping, target)?
            .map(|delivery| shipping.processing_time.offset_by(&delivery)))
    }
}
