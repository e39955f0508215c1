use shipquote_core::{Money, ShippingResult};

use crate::purchase::PurchaseItem;

/// Anything a purchase item can be bought for.
pub trait Sellable {
    /// Unit price charged for `item`.
    fn price_for_purchase_item(&self, item: &PurchaseItem) -> ShippingResult<Money>;
}
