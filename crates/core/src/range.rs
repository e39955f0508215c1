//! Day ranges for delivery estimates and their projection onto dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ShippingError, ShippingResult};
use crate::value_object::ValueObject;

/// `(min, max)` delivery time in whole days.
///
/// Reference data is expected to keep `min <= max` (see [`Self::validated`]),
/// but merge and offset operate field by field and do not depend on it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryTimeRange {
    pub min: u32,
    pub max: u32,
}

impl ValueObject for DeliveryTimeRange {}

impl DeliveryTimeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn validated(min: u32, max: u32) -> ShippingResult<Self> {
        let range = Self::new(min, max);
        if !range.is_ordered() {
            return Err(ShippingError::validation(format!(
                "delivery time range min ({min}) exceeds max ({max})"
            )));
        }
        Ok(range)
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Per-field maximum across all ranges.
    pub fn merge<I>(ranges: I) -> ShippingResult<Self>
    where
        I: IntoIterator<Item = DeliveryTimeRange>,
    {
        ranges
            .into_iter()
            .reduce(|acc, r| Self::new(acc.min.max(r.min), acc.max.max(r.max)))
            .ok_or(ShippingError::EmptyRangeSet)
    }

    /// Component-wise sum with `other`.
    pub fn offset_by(&self, other: &DeliveryTimeRange) -> Self {
        Self::new(
            self.min.saturating_add(other.min),
            self.max.saturating_add(other.max),
        )
    }

    /// Project onto calendar dates starting at `start`.
    pub fn dates_from(&self, start: NaiveDate, counting: DayCount) -> ShippingResult<DateRange> {
        Ok(DateRange {
            from: counting.advance(start, self.min)?,
            to: counting.advance(start, self.max)?,
        })
    }
}

impl core::fmt::Display for DeliveryTimeRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.min == self.max {
            write!(f, "{} days", self.min)
        } else {
            write!(f, "{} - {} days", self.min, self.max)
        }
    }
}

/// How a number of days is laid onto the calendar.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCount {
    /// Every day counts.
    #[default]
    Calendar,
    /// Saturdays and Sundays are skipped.
    Weekdays,
}

impl DayCount {
    pub fn advance(self, start: NaiveDate, days: u32) -> ShippingResult<NaiveDate> {
        let out_of_range = || ShippingError::validation("shipping date out of range");
        match self {
            DayCount::Calendar => start
                .checked_add_days(Days::new(u64::from(days)))
                .ok_or_else(out_of_range),
            DayCount::Weekdays => {
                let mut date = start;
                let mut remaining = days;
                while remaining > 0 {
                    date = date.succ_opt().ok_or_else(out_of_range)?;
                    if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                        remaining -= 1;
                    }
                }
                Ok(date)
            }
        }
    }
}

/// Calendar window in which a shipment is expected to arrive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ValueObject for DateRange {}

impl core::fmt::Display for DateRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}
