//! Price records and the fields derived from them

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Currency used for the selected price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Currency {
    #[default]
    #[serde(rename = "SEK")]
    Sek,
    #[serde(rename = "EUR")]
    Eur,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Currency::Sek => "SEK",
                Currency::Eur => "EUR",
            }
        )
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SEK" => Ok(Currency::Sek),
            "EUR" => Ok(Currency::Eur),
            _ => Err(anyhow::anyhow!("Invalid currency: {} (expected SEK or EUR)", s)),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of the price file, keyed by its timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord {
    pub timestamp: NaiveDateTime,
    pub price_sek: f32,
    pub price_eur: f32,
}

impl PriceRecord {
    pub fn price(&self, currency: Currency) -> f32 {
        match currency {
            Currency::Sek => self.price_sek,
            Currency::Eur => self.price_eur,
        }
    }
}

/// Loaded price history, sorted by timestamp ascending.
///
/// Built once by the loader and shared read-only afterwards; nothing hands
/// out a mutable view of the records.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    records: Vec<PriceRecord>,
}

impl PriceTable {
    /// Builds a table, sorting the records if they are not already ordered.
    pub fn new(mut records: Vec<PriceRecord>) -> Self {
        if !records.is_sorted_by_key(|r| r.timestamp) {
            records.sort_by_key(|r| r.timestamp);
        }
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.records.last().map(|r| r.timestamp)
    }
}

/// A record with its calendar fields and selected price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub year: i32,
    pub month: u32,
    pub hour: u32,
    pub price: f32,
}

impl PricePoint {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Splits a timestamp into (year, month, hour) in its own wall-clock time.
pub fn decompose(timestamp: NaiveDateTime) -> (i32, u32, u32) {
    (timestamp.year(), timestamp.month(), timestamp.hour())
}

/// Derives a [`PricePoint`] per record, taking the price in `currency`.
pub fn select<'a, I>(records: I, currency: Currency) -> Vec<PricePoint>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    records
        .into_iter()
        .map(|record| {
            let (year, month, hour) = decompose(record.timestamp);
            PricePoint {
                timestamp: record.timestamp,
                year,
                month,
                hour,
                price: record.price(currency),
            }
        })
        .collect()
}
