//! Rules deciding whether discounted items ship for free.

use tracing::warn;

use shipquote_core::{CurrencyConverter, Money};

/// Business rule consulted before pricing: when it holds for the purchase
/// total, line items flagged as discounted are left out of the shipping price.
pub trait DiscountPolicy {
    fn is_eligible_for_discount_filtering(&self, total_purchase_price: &Money) -> bool;
}

impl<F> DiscountPolicy for F
where
    F: Fn(&Money) -> bool,
{
    fn is_eligible_for_discount_filtering(&self, total_purchase_price: &Money) -> bool {
        self(total_purchase_price)
    }
}

/// Discounted items are always charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDiscounts;

impl DiscountPolicy for NoDiscounts {
    fn is_eligible_for_discount_filtering(&self, _total_purchase_price: &Money) -> bool {
        false
    }
}

/// Discounted items ship free once the purchase total reaches a threshold.
///
/// Totals in another currency are converted into the threshold currency
/// first. A total that cannot be converted never qualifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountThreshold<C> {
    threshold: Money,
    converter: C,
}

impl<C: CurrencyConverter> DiscountThreshold<C> {
    pub fn new(threshold: Money, converter: C) -> Self {
        Self {
            threshold,
            converter,
        }
    }

    pub fn threshold(&self) -> &Money {
        &self.threshold
    }
}

impl<C: CurrencyConverter> DiscountPolicy for DiscountThreshold<C> {
    fn is_eligible_for_discount_filtering(&self, total_purchase_price: &Money) -> bool {
        match total_purchase_price.convert_to(self.threshold.currency(), &self.converter) {
            Ok(total) => total.amount() >= self.threshold.amount(),
            Err(error) => {
                warn!(
                    total = %total_purchase_price,
                    threshold = %self.threshold,
                    %error,
                    "purchase total cannot be compared with the discount threshold"
                );
                false
            }
        }
    }
}
