//! Infrastructure layer: configuration, reference data loading, batch quoting.

pub mod catalog;
pub mod config;
pub mod quote;

pub use catalog::{CatalogError, ShippingCatalog};
pub use config::{ConfigError, EngineConfig};
pub use quote::{QuoteOutcome, QuoteService, ShipmentQuote};

use anyhow::Context;
use tracing::info;

/// Start logging and load the configured catalog.
pub fn bootstrap(config: &EngineConfig) -> anyhow::Result<ShippingCatalog> {
    shipquote_observability::init(config.log_format);

    let path = config
        .catalog_path
        .as_deref()
        .with_context(|| format!("{} is not set", config::CATALOG_VAR))?;
    let catalog = ShippingCatalog::load(path)
        .with_context(|| format!("loading shipping catalog from {}", path.display()))?;

    info!(
        reference_currency = %config.reference_currency,
        discount_threshold = ?config.discount_threshold,
        "shipping engine ready"
    );
    Ok(catalog)
}
