//! Currency-aware monetary amounts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ShippingError, ShippingResult};
use crate::value_object::ValueObject;

/// ISO 4217 currency code (three uppercase ASCII letters).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> ShippingResult<Self> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ShippingError::validation(format!(
                "currency code must be three letters, got {code:?}"
            )));
        }
        Ok(Self(code))
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Pound sterling, the default reference currency.
impl Default for Currency {
    fn default() -> Self {
        Self("GBP".to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = ShippingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl core::str::FromStr for Currency {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An amount in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl ValueObject for Money {}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Same-currency addition.
    pub fn checked_add(&self, other: &Money) -> ShippingResult<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| ShippingError::validation("monetary overflow"))?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    /// Multiply by a unit count.
    pub fn times(&self, units: u32) -> ShippingResult<Money> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(units))
            .ok_or_else(|| ShippingError::validation("monetary overflow"))?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    pub fn ensure_same_currency(&self, other: &Money) -> ShippingResult<()> {
        if self.currency != other.currency {
            return Err(ShippingError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }

    /// Express this amount in `target`, asking the converter only when the
    /// currencies differ.
    pub fn convert_to<C>(&self, target: &Currency, converter: &C) -> ShippingResult<Money>
    where
        C: CurrencyConverter + ?Sized,
    {
        if &self.currency == target {
            return Ok(self.clone());
        }
        let amount = converter.convert(self.amount, &self.currency, target)?;
        Ok(Money::new(amount, target.clone()))
    }

    /// Sum amounts that must all be in `currency`.
    pub fn sum_same_currency<'a, I>(values: I, currency: &Currency) -> ShippingResult<Money>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(currency.clone()), |acc, value| acc.checked_add(value))
    }

    /// Sum amounts in any currencies into `target`.
    pub fn sum<'a, I, C>(values: I, target: &Currency, converter: &C) -> ShippingResult<Money>
    where
        I: IntoIterator<Item = &'a Money>,
        C: CurrencyConverter + ?Sized,
    {
        values
            .into_iter()
            .try_fold(Money::zero(target.clone()), |acc, value| {
                acc.checked_add(&value.convert_to(target, converter)?)
            })
    }

    /// Round to the currency's minor unit (two decimal places, banker's rounding).
    pub fn rounded(&self) -> Money {
        Money::new(self.amount.round_dp(2), self.currency.clone())
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

/// Currency/monetary service.
///
/// `reference_currency` is the common currency used when amounts in
/// different currencies have to be compared.
pub trait CurrencyConverter {
    fn reference_currency(&self) -> &Currency;

    fn convert(&self, amount: Decimal, from: &Currency, to: &Currency) -> ShippingResult<Decimal>;
}

impl<T: CurrencyConverter + ?Sized> CurrencyConverter for &T {
    fn reference_currency(&self) -> &Currency {
        (**self).reference_currency()
    }

    fn convert(&self, amount: Decimal, from: &Currency, to: &Currency) -> ShippingResult<Decimal> {
        (**self).convert(amount, from, to)
    }
}

/// Fixed exchange rates relative to a base currency.
///
/// A rate says how many units of a currency one unit of the base buys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRates {
    base: Currency,
    rates: BTreeMap<Currency, Decimal>,
}

impl StaticRates {
    pub fn new(base: Currency) -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(base.clone(), Decimal::ONE);
        Self { base, rates }
    }

    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> ShippingResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(ShippingError::validation(format!(
                "exchange rate for {currency} must be positive"
            )));
        }
        if currency == self.base && rate != Decimal::ONE {
            return Err(ShippingError::validation("base currency rate must be 1"));
        }
        self.rates.insert(currency, rate);
        Ok(self)
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    fn rate(&self, currency: &Currency) -> ShippingResult<Decimal> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| ShippingError::UnsupportedCurrency(currency.clone()))
    }
}

impl CurrencyConverter for StaticRates {
    fn reference_currency(&self) -> &Currency {
        &self.base
    }

    fn convert(&self, amount: Decimal, from: &Currency, to: &Currency) -> ShippingResult<Decimal> {
        if from == to {
            return Ok(amount);
        }
        let in_base = amount
            .checked_div(self.rate(from)?)
            .ok_or_else(|| ShippingError::validation("monetary overflow"))?;
        in_base
            .checked_mul(self.rate(to)?)
            .ok_or_else(|| ShippingError::validation("monetary overflow"))
    }
}
