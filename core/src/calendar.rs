//! Batch calendar: the contiguous day range transactions are generated over,
//! and the date customers start joining from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First customer joins on this day; each subsequent customer one day later.
pub fn joining_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid literal date")
}

/// Default first day of the transaction range.
pub fn default_transaction_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid literal date")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub days: u32,
}

impl DateRange {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }

    /// Every day in the range, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days as usize)
    }

    /// Last day of the range, `None` when the range is empty.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.iter().last()
    }
}
