//! Purchased items and the purchase context a shipment is priced in.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shipquote_core::{
    Currency, CurrencyConverter, Entity, LocationId, Money, ProductId, PurchaseItemId,
    ShippingError, ShippingResult,
};
use shipquote_rules::Shipping;

use crate::sellable::Sellable;

/// A sellable product together with its shipping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub shipping: Arc<Shipping>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money, shipping: Arc<Shipping>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            shipping,
        }
    }
}

impl Sellable for Product {
    fn price_for_purchase_item(&self, _item: &PurchaseItem) -> ShippingResult<Money> {
        Ok(self.price.clone())
    }
}

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItem {
    id: PurchaseItemId,
    product: Product,
    quantity: u32,
    is_payable: bool,
    is_discounted: bool,
}

impl PurchaseItem {
    pub fn new(id: PurchaseItemId, product: Product, quantity: u32) -> ShippingResult<Self> {
        if quantity == 0 {
            return Err(ShippingError::validation("quantity must be positive"));
        }
        Ok(Self {
            id,
            product,
            quantity,
            is_payable: true,
            is_discounted: false,
        })
    }

    pub fn with_payable(mut self, is_payable: bool) -> Self {
        self.is_payable = is_payable;
        self
    }

    pub fn with_discounted(mut self, is_discounted: bool) -> Self {
        self.is_discounted = is_discounted;
        self
    }

    pub fn id(&self) -> PurchaseItemId {
        self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn shipping(&self) -> &Shipping {
        &self.product.shipping
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_payable(&self) -> bool {
        self.is_payable
    }

    pub fn is_discounted(&self) -> bool {
        self.is_discounted
    }

    /// Unit price times quantity.
    pub fn total_price(&self) -> ShippingResult<Money> {
        self.product
            .price_for_purchase_item(self)?
            .times(self.quantity)
    }
}

impl Entity for PurchaseItem {
    type Id = PurchaseItemId;

    fn id(&self) -> PurchaseItemId {
        self.id
    }
}

/// Sum of the payable items, in `currency`.
pub fn total_payable<'a, I, C>(items: I, currency: &Currency, converter: &C) -> ShippingResult<Money>
where
    I: IntoIterator<Item = &'a PurchaseItem>,
    C: CurrencyConverter + ?Sized,
{
    let totals = items
        .into_iter()
        .filter(|item| item.is_payable())
        .map(PurchaseItem::total_price)
        .collect::<ShippingResult<Vec<_>>>()?;
    Money::sum(&totals, currency, converter)
}

/// What the surrounding purchase tells a shipment about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseContext {
    pub currency: Currency,
    pub ship_to: Option<LocationId>,
    pub paid_at: Option<NaiveDate>,
    /// Sum of payable, non-shipping purchase items.
    pub total_purchase_price: Option<Money>,
}

impl PurchaseContext {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            ship_to: None,
            paid_at: None,
            total_purchase_price: None,
        }
    }

    pub fn with_ship_to(mut self, location: LocationId) -> Self {
        self.ship_to = Some(location);
        self
    }

    pub fn with_paid_at(mut self, paid_at: NaiveDate) -> Self {
        self.paid_at = Some(paid_at);
        self
    }

    pub fn with_total_purchase_price(mut self, total: Money) -> Self {
        self.total_purchase_price = Some(total);
        self
    }
}
