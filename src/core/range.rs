//! Date range selection over a sorted price table.
use crate::core::price::PriceRecord;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the end date of a range is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBound {
    /// Every timestamp on the end date is included.
    #[default]
    FullDay,
    /// Only the midnight instant that starts the end date is included.
    Midnight,
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// True when both dates lie inside `outer`.
    pub fn is_within(&self, outer: &DateRange) -> bool {
        self.start >= outer.start && self.end <= outer.end
    }

    fn lower(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, timestamp: NaiveDateTime, bound: EndBound) -> bool {
        if timestamp < self.lower() {
            return false;
        }
        match bound {
            EndBound::Midnight => timestamp <= self.end.and_time(NaiveTime::MIN),
            EndBound::FullDay => match self.end.checked_add_days(Days::new(1)) {
                Some(next) => timestamp < next.and_time(NaiveTime::MIN),
                None => true,
            },
        }
    }
}

/// Returns the records inside `range`. `records` must be sorted by timestamp.
///
/// An inverted range is not an error; it selects nothing.
pub fn filter_records<'a>(
    records: &'a [PriceRecord],
    range: &DateRange,
    bound: EndBound,
) -> &'a [PriceRecord] {
    if range.is_inverted() {
        warn!(start = %range.start, end = %range.end, "Start date is after end date");
        return &[];
    }

    let lower = records.partition_point(|r| r.timestamp < range.lower());
    let upper = records.partition_point(|r| {
        r.timestamp < range.lower() || range.contains(r.timestamp, bound)
    });
    let selected = &records[lower..upper];
    debug!(
        start = %range.start,
        end = %range.end,
        ?bound,
        rows = selected.len(),
        "Filtered price records"
    );
    selected
}
