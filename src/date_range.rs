//! Optional date range filters taken from query strings, e.g. `?from=2025-10-01&to=2025-10-31`.

use std::ops::RangeInclusive;

use serde::Deserialize;
use time::Date;

use crate::Error;

/// An inclusive date filter where either end may be left open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRangeQuery {
    /// The earliest date to include.
    pub from: Option<Date>,
    /// The latest date to include.
    pub to: Option<Date>,
}

impl DateRangeQuery {
    /// Convert the query into a date range, or `None` if neither end is set.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidDateRange] if `from` is after `to`.
    pub fn into_range(self) -> Result<Option<RangeInclusive<Date>>, Error> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange(from, to)),
            (from, to) => Ok(Some(
                from.unwrap_or(Date::MIN)..=to.unwrap_or(Date::MAX),
            )),
        }
    }
}
