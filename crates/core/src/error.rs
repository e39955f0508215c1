//! Shipping engine error model.

use thiserror::Error;

use crate::id::{LocationId, ShippingId, ShippingMethodId};
use crate::money::Currency;

/// Result type used across the shipping engine.
pub type ShippingResult<T> = Result<T, ShippingError>;

/// Engine-level error.
///
/// Lookup failures indicate broken reference data and are surfaced as-is.
/// The absence of a matching shipping group is not an error; resolvers
/// return `None` for it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// The location is not part of the hierarchy.
    #[error("unknown location: {0}")]
    UnknownLocation(LocationId),

    /// None of the candidate locations contains the target.
    #[error("no candidate location contains {0}")]
    NotFound(LocationId),

    /// A delivery time merge was requested over no ranges.
    #[error("cannot merge an empty set of delivery time ranges")]
    EmptyRangeSet,

    /// The purchase total needed for discount filtering is unavailable.
    #[error("total purchase price is not available")]
    MissingPurchaseTotal,

    /// Shipping dates were requested for an unpaid purchase.
    #[error("purchase has no paid date")]
    MissingPaidDate,

    /// The purchase has no shipping destination.
    #[error("purchase has no shipping destination")]
    MissingDestination,

    /// Two amounts that must share a currency do not.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// The currency service cannot handle the currency.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(Currency),

    /// More than one group binds the same method to the same location.
    #[error("ambiguous shipping groups for method {method} at location {location}")]
    AmbiguousGroupMatch {
        method: ShippingMethodId,
        location: LocationId,
    },

    /// A shipping configuration referenced by id does not exist.
    #[error("unknown shipping configuration: {0}")]
    UnknownShipping(ShippingId),

    /// A shipping method referenced by id does not exist.
    #[error("unknown shipping method: {0}")]
    UnknownMethod(ShippingMethodId),

    /// The location tree is malformed (cycle, dangling parent, no single root).
    #[error("invalid location hierarchy: {0}")]
    InvalidHierarchy(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ShippingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_hierarchy(msg: impl Into<String>) -> Self {
        Self::InvalidHierarchy(msg.into())
    }

    pub fn currency_mismatch(expected: &Currency, found: &Currency) -> Self {
        Self::CurrencyMismatch {
            expected: expected.clone(),
            found: found.clone(),
        }
    }
}
