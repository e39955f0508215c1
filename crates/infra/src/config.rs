//! Engine configuration.
//!
//! Everything has a default; the environment overrides:
//!
//! | variable                        | example             |
//! |---------------------------------|---------------------|
//! | `SHIPQUOTE_REFERENCE_CURRENCY`  | `GBP`               |
//! | `SHIPQUOTE_RATES`               | `EUR=1.17,USD=1.27` |
//! | `SHIPQUOTE_DISCOUNT_THRESHOLD`  | `100.00`            |
//! | `SHIPQUOTE_CATALOG`             | `catalog.json`      |
//! | `SHIPQUOTE_LOG_FORMAT`          | `json` / `pretty`   |

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;

use shipquote_core::{Currency, Money, ShippingResult, StaticRates};
use shipquote_observability::LogFormat;
use shipquote_pricing::{DiscountPolicy, DiscountThreshold, NoDiscounts};

pub const REFERENCE_CURRENCY_VAR: &str = "SHIPQUOTE_REFERENCE_CURRENCY";
pub const RATES_VAR: &str = "SHIPQUOTE_RATES";
pub const DISCOUNT_THRESHOLD_VAR: &str = "SHIPQUOTE_DISCOUNT_THRESHOLD";
pub const CATALOG_VAR: &str = "SHIPQUOTE_CATALOG";
pub const LOG_FORMAT_VAR: &str = "SHIPQUOTE_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {key}: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(key: &'static str, message: impl core::fmt::Display) -> Self {
        Self {
            key,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Currency prices are compared in.
    pub reference_currency: Currency,
    /// Units of each currency one unit of the reference currency buys.
    pub rates: BTreeMap<Currency, Decimal>,
    /// Purchase total (in the reference currency) from which discounted
    /// items ship free. `None` charges them always.
    pub discount_threshold: Option<Decimal>,
    pub catalog_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl EngineConfig {
    pub fn with_reference_currency(mut self, currency: Currency) -> Self {
        self.reference_currency = currency;
        self
    }

    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    pub fn with_discount_threshold(mut self, threshold: Decimal) -> Self {
        self.discount_threshold = Some(threshold);
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(code) = get(REFERENCE_CURRENCY_VAR) {
            config.reference_currency =
                Currency::new(&code).map_err(|e| ConfigError::new(REFERENCE_CURRENCY_VAR, e))?;
        }
        if let Some(rates) = get(RATES_VAR) {
            config.rates = parse_rates(&rates)?;
        }
        if let Some(threshold) = get(DISCOUNT_THRESHOLD_VAR) {
            let threshold: Decimal = threshold
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(DISCOUNT_THRESHOLD_VAR, e))?;
            if threshold.is_sign_negative() {
                return Err(ConfigError::new(DISCOUNT_THRESHOLD_VAR, "must not be negative"));
            }
            config.discount_threshold = Some(threshold);
        }
        if let Some(path) = get(CATALOG_VAR) {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(format) = get(LOG_FORMAT_VAR) {
            config.log_format = format.parse().map_err(|e| ConfigError::new(LOG_FORMAT_VAR, e))?;
        }

        Ok(config)
    }

    /// Exchange rates relative to the reference currency.
    pub fn currency_rates(&self) -> ShippingResult<StaticRates> {
        self.rates
            .iter()
            .filter(|(currency, _)| **currency != self.reference_currency)
            .try_fold(
                StaticRates::new(self.reference_currency.clone()),
                |rates, (currency, rate)| rates.with_rate(currency.clone(), *rate),
            )
    }

    /// Threshold policy in the reference currency; purchase totals in other
    /// currencies are converted with [`Self::currency_rates`].
    pub fn discount_policy(&self) -> ShippingResult<Box<dyn DiscountPolicy + Send + Sync>> {
        Ok(match self.discount_threshold {
            Some(amount) => Box::new(DiscountThreshold::new(
                Money::new(amount, self.reference_currency.clone()),
                self.currency_rates()?,
            )),
            None => Box::new(NoDiscounts),
        })
    }
}

/// `EUR=1.17,USD=1.27`
fn parse_rates(value: &str) -> Result<BTreeMap<Currency, Decimal>, ConfigError> {
    let mut rates = BTreeMap::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (code, rate) = entry.split_once('=').ok_or_else(|| {
            ConfigError::new(RATES_VAR, format!("expected CODE=RATE, got {entry:?}"))
        })?;
        let currency = Currency::new(code).map_err(|e| ConfigError::new(RATES_VAR, e))?;
        let rate: Decimal = rate
            .trim()
            .parse()
            .map_err(|e| ConfigError::new(RATES_VAR, format!("{code}: {e}")))?;
        rates.insert(currency, rate);
    }
    Ok(rates)
}
