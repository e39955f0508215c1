//! Reference data snapshot: locations, methods and shipping configurations.
//!
//! Loaded from JSON of the form
//!
//! ```json
//! {
//!   "locations": [{ "id": 1, "name": "Everywhere", "kind": "everywhere" }, ...],
//!   "methods":   [{ "id": 1, "name": "Post" }, ...],
//!   "shippings": [{ "id": 1, "currency": "GBP", "ships_from": 3,
//!                   "processing_time": { "min": 1, "max": 2 }, "groups": [...] }]
//! }
//! ```
//!
//! and validated as a whole before anything can resolve against it.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use shipquote_core::{
    CurrencyConverter, ShippingError, ShippingId, ShippingMethodId, ShippingResult,
};
use shipquote_locations::{Location, LocationHierarchy};
use shipquote_rules::{Shipping, ShippingMethod, ShippingResolver};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    Invalid(#[from] ShippingError),
}

/// Wire form of a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    locations: Vec<Location>,
    #[serde(default)]
    methods: Vec<ShippingMethod>,
    #[serde(default)]
    shippings: Vec<Shipping>,
}

/// Validated, immutable reference data.
#[derive(Debug, Clone)]
pub struct ShippingCatalog {
    hierarchy: LocationHierarchy,
    methods: BTreeMap<ShippingMethodId, ShippingMethod>,
    shippings: BTreeMap<ShippingId, Arc<Shipping>>,
}

impl ShippingCatalog {
    pub fn new(
        hierarchy: LocationHierarchy,
        methods: Vec<ShippingMethod>,
        shippings: Vec<Shipping>,
    ) -> ShippingResult<Self> {
        let mut by_id = BTreeMap::new();
        for method in methods {
            let id = method.id;
            if by_id.insert(id, method).is_some() {
                return Err(ShippingError::validation(format!("duplicate shipping method {id}")));
            }
        }

        let mut catalog = Self {
            hierarchy,
            methods: by_id,
            shippings: BTreeMap::new(),
        };
        for shipping in shippings {
            catalog.validate(&shipping)?;
            let id = shipping.id;
            if catalog.shippings.insert(id, Arc::new(shipping)).is_some() {
                return Err(ShippingError::validation(format!("duplicate shipping {id}")));
            }
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let hierarchy = LocationHierarchy::new(document.locations)?;
        Ok(Self::new(hierarchy, document.methods, document.shippings)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            locations = catalog.hierarchy.len(),
            methods = catalog.methods.len(),
            shippings = catalog.shippings.len(),
            "shipping catalog loaded"
        );
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        let document = CatalogDocument {
            locations: self.hierarchy.iter().cloned().collect(),
            methods: self.methods.values().cloned().collect(),
            shippings: self.shippings.values().map(|s| Shipping::clone(s)).collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn hierarchy(&self) -> &LocationHierarchy {
        &self.hierarchy
    }

    pub fn method(&self, id: ShippingMethodId) -> ShippingResult<&ShippingMethod> {
        self.methods.get(&id).ok_or(ShippingError::UnknownMethod(id))
    }

    pub fn methods(&self) -> impl Iterator<Item = &ShippingMethod> {
        self.methods.values()
    }

    pub fn shipping(&self, id: ShippingId) -> ShippingResult<Arc<Shipping>> {
        self.shippings
            .get(&id)
            .cloned()
            .ok_or(ShippingError::UnknownShipping(id))
    }

    pub fn shippings(&self) -> impl Iterator<Item = &Arc<Shipping>> {
        self.shippings.values()
    }

    /// Group resolution against this catalog's hierarchy.
    pub fn resolver<'a, C>(&'a self, converter: &'a C) -> ShippingResolver<'a, C>
    where
        C: CurrencyConverter + ?Sized,
    {
        ShippingResolver::new(&self.hierarchy, converter)
    }

    fn validate(&self, shipping: &Shipping) -> ShippingResult<()> {
        let invalid = |message: String| {
            ShippingError::validation(format!("shipping {}: {message}", shipping.id))
        };

        self.hierarchy.get(shipping.ships_from)?;
        if !shipping.processing_time.is_ordered() {
            return Err(invalid(format!(
                "processing time {} ends before it starts",
                shipping.processing_time
            )));
        }

        let mut group_ids = HashSet::new();
        for group in &shipping.groups {
            if !group_ids.insert(group.id) {
                return Err(invalid(format!("duplicate group {}", group.id)));
            }
            self.method(group.method)?;
            if group.locations.is_empty() {
                return Err(invalid(format!("group {} has no locations", group.id)));
            }
            for &location in &group.locations {
                self.hierarchy.get(location)?;
            }
            if !group.delivery_time.is_ordered() {
                return Err(invalid(format!(
                    "group {} delivery time {} ends before it starts",
                    group.id, group.delivery_time
                )));
            }
            if let Some(additional) = &group.additional_item_price {
                group.price.ensure_same_currency(additional)?;
            }
        }

        shipping.ensure_unambiguous()
    }
}
