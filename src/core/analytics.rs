//! Mean price aggregations over selected price points.
//!
//! Every bucket carries an `Option<f64>` mean so that a bucket without rows
//! is never confused with a zero price.
use crate::core::price::PricePoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const SWEDISH_MONTHS: [&str; 12] = [
    "Januari", "Februari", "Mars", "April", "Maj", "Juni", "Juli", "Augusti", "September",
    "Oktober", "November", "December",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Language used for month labels in the monthly pivot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthNames {
    #[default]
    Swedish,
    English,
}

impl MonthNames {
    /// Name of `month` (1-12).
    pub fn name(&self, month: u32) -> &'static str {
        let names = match self {
            MonthNames::Swedish => &SWEDISH_MONTHS,
            MonthNames::English => &ENGLISH_MONTHS,
        };
        names[(month.clamp(1, 12) - 1) as usize]
    }

    /// Zero-padded month number followed by its name, e.g. `03 Mars`.
    pub fn label(&self, month: u32) -> String {
        format!("{:02} {}", month, self.name(month))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f32) {
        self.sum += f64::from(value);
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// A single time bucket and its mean price.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K> {
    pub key: K,
    pub mean: Option<f64>,
    pub count: usize,
}

/// Chronological buckets. Buckets between the first and the last populated
/// bucket that hold no rows are kept with `mean: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<K> {
    pub buckets: Vec<Bucket<K>>,
}

impl<K: PartialEq> Series<K> {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.buckets
            .iter()
            .find(|b| &b.key == key)
            .and_then(|b| b.mean)
    }

    /// Largest populated mean, if any.
    pub fn max_mean(&self) -> Option<f64> {
        self.buckets
            .iter()
            .filter_map(|b| b.mean)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub key: u32,
    pub label: String,
    /// One value per entry in [`Pivot::columns`].
    pub values: Vec<Option<f64>>,
}

/// Wide-form table: one row per sub-period, one column per year.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub columns: Vec<i32>,
    pub rows: Vec<PivotRow>,
}

impl Pivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: u32, year: i32) -> Option<f64> {
        let column = self.columns.iter().position(|&y| y == year)?;
        self.rows
            .iter()
            .find(|r| r.key == key)
            .and_then(|r| r.values[column])
    }

    fn from_groups(groups: BTreeMap<(i32, u32), Mean>, label: impl Fn(u32) -> String) -> Self {
        let columns: Vec<i32> = groups
            .keys()
            .map(|(year, _)| *year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let keys: BTreeSet<u32> = groups.keys().map(|(_, key)| *key).collect();

        let rows = keys
            .into_iter()
            .map(|key| PivotRow {
                key,
                label: label(key),
                values: columns
                    .iter()
                    .map(|year| groups.get(&(*year, key)).and_then(Mean::value))
                    .collect(),
            })
            .collect();

        Pivot { columns, rows }
    }
}

/// Label for a yearly bucket: the last day of the year.
pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// Mean price per calendar day.
pub fn daily_mean(points: &[PricePoint]) -> Series<NaiveDate> {
    let mut groups: BTreeMap<NaiveDate, Mean> = BTreeMap::new();
    for point in points {
        groups.entry(point.date()).or_default().add(point.price);
    }

    let (Some(first), Some(last)) = (
        groups.keys().next().copied(),
        groups.keys().next_back().copied(),
    ) else {
        return Series { buckets: vec![] };
    };

    let buckets: Vec<_> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            let mean = groups.get(&day).copied().unwrap_or_default();
            Bucket {
                key: day,
                mean: mean.value(),
                count: mean.count,
            }
        })
        .collect();
    debug!(days = buckets.len(), populated = groups.len(), "Computed daily means");
    Series { buckets }
}

/// Mean price per calendar year.
pub fn yearly_mean(points: &[PricePoint]) -> Series<i32> {
    let mut groups: BTreeMap<i32, Mean> = BTreeMap::new();
    for point in points {
        groups.entry(point.year).or_default().add(point.price);
    }

    let (Some(first), Some(last)) = (
        groups.keys().next().copied(),
        groups.keys().next_back().copied(),
    ) else {
        return Series { buckets: vec![] };
    };

    let buckets = (first..=last)
        .map(|year| {
            let mean = groups.get(&year).copied().unwrap_or_default();
            Bucket {
                key: year,
                mean: mean.value(),
                count: mean.count,
            }
        })
        .collect();
    Series { buckets }
}

/// Mean price per (year, month), one row per month and one column per year.
pub fn monthly_pivot(points: &[PricePoint], names: MonthNames) -> Pivot {
    let mut groups: BTreeMap<(i32, u32), Mean> = BTreeMap::new();
    for point in points {
        groups
            .entry((point.year, point.month))
            .or_default()
            .add(point.price);
    }
    Pivot::from_groups(groups, |month| names.label(month))
}

/// Mean price per (year, hour of day), one row per hour and one column per year.
pub fn hourly_pivot(points: &[PricePoint]) -> Pivot {
    let mut groups: BTreeMap<(i32, u32), Mean> = BTreeMap::new();
    for point in points {
        groups
            .entry((point.year, point.hour))
            .or_default()
            .add(point.price);
    }
    Pivot::from_groups(groups, |hour| format!("{hour:02}"))
}
