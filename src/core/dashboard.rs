//! A loaded price table and the queries run against it.
use crate::core::analytics::{self, MonthNames, Pivot, Series};
use crate::core::loader::{LoadError, load_price_table};
use crate::core::price::{Currency, PriceTable, select};
use crate::core::range::{DateRange, EndBound, filter_records};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Inputs that drive one refresh of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Query {
    pub currency: Currency,
    /// `None` selects the whole table.
    pub range: Option<DateRange>,
    pub end_bound: EndBound,
    pub month_names: MonthNames,
}

/// Row count and time span of a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

/// The four aggregate views for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub currency: Currency,
    /// The filtered rows.
    pub summary: Summary,
    /// The whole loaded table.
    pub dataset: Summary,
    pub daily: Series<NaiveDate>,
    pub monthly: Pivot,
    pub yearly: Series<i32>,
    pub hourly: Pivot,
}

impl DashboardViews {
    pub fn is_empty(&self) -> bool {
        self.summary.count == 0
    }
}

/// Holds the price table for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<PriceTable>,
}

impl Dashboard {
    /// Loads the price file once. Every later query reuses the same table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let table = load_price_table(path)?;
        Ok(Self::from_table(Arc::new(table)))
    }

    pub fn from_table(table: Arc<PriceTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> Arc<PriceTable> {
        Arc::clone(&self.table)
    }

    /// First and last date in the data, used when no range is given.
    pub fn default_range(&self) -> Option<DateRange> {
        let first = self.table.first_timestamp()?;
        let last = self.table.last_timestamp()?;
        Some(DateRange::new(first.date(), last.date()))
    }

    pub fn query(&self, query: &Query) -> DashboardViews {
        let records = match query.range {
            Some(range) => filter_records(self.table.records(), &range, query.end_bound),
            None => self.table.records(),
        };
        let points = select(records, query.currency);
        debug!(?query, rows = points.len(), "Computing dashboard views");

        DashboardViews {
            currency: query.currency,
            summary: Summary {
                count: points.len(),
                first: points.first().map(|p| p.timestamp),
                last: points.last().map(|p| p.timestamp),
            },
            dataset: Summary {
                count: self.table.len(),
                first: self.table.first_timestamp(),
                last: self.table.last_timestamp(),
            },
            daily: analytics::daily_mean(&points),
            monthly: analytics::monthly_pivot(&points, query.month_names),
            yearly: analytics::yearly_mean(&points),
            hourly: analytics::hourly_pivot(&points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PriceRecord;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Two days per year in 2022 and 2023, every hour, SEK = 10 * EUR.
    fn dashboard() -> Dashboard {
        let mut records = Vec::new();
        for start in ["2022-03-01", "2023-03-01"] {
            let start = date(start).and_hms_opt(0, 0, 0).unwrap();
            for h in 0..48 {
                let eur = (h % 24) as f32 + 1.0;
                records.push(PriceRecord {
                    timestamp: start + Duration::hours(h),
                    price_sek: eur * 10.0,
                    price_eur: eur,
                });
            }
        }
        Dashboard::from_table(Arc::new(PriceTable::new(records)))
    }

    #[test]
    fn test_default_range_spans_data() {
        let range = dashboard().default_range().unwrap();
        assert_eq!(range.start, date("2022-03-01"));
        assert_eq!(range.end, date("2023-03-02"));
    }

    #[test]
    fn test_query_whole_table() {
        let views = dashboard().query(&Query::default());

        assert_eq!(views.summary.count, 96);
        assert_eq!(views.currency, Currency::Sek);
        assert_eq!(views.monthly.columns, vec![2022, 2023]);
        assert_eq!(views.monthly.rows.len(), 1);
        // Mean of 1..=24 is 12.5
        assert_eq!(views.monthly.get(3, 2022), Some(125.0));
        assert_eq!(views.yearly.len(), 2);
        assert_eq!(views.hourly.rows.len(), 24);
        assert_eq!(views.hourly.get(5, 2023), Some(60.0));
    }

    #[test]
    fn test_query_with_range() {
        let query = Query {
            currency: Currency::Eur,
            range: Some(DateRange::new(date("2022-03-02"), date("2022-03-02"))),
            ..Query::default()
        };

        let views = dashboard().query(&query);

        assert_eq!(views.summary.count, 24);
        assert_eq!(views.dataset.count, 96);
        assert_eq!(
            views.dataset.first,
            date("2022-03-01").and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            views.dataset.last,
            date("2023-03-02").and_hms_opt(23, 0, 0)
        );
        assert_eq!(
            views.summary.first,
            date("2022-03-02").and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            views.summary.last,
            date("2022-03-02").and_hms_opt(23, 0, 0)
        );
        assert_eq!(views.daily.len(), 1);
        assert_eq!(views.daily.get(&date("2022-03-02")), Some(12.5));
        assert_eq!(views.monthly.columns, vec![2022]);
    }

    #[test]
    fn test_empty_range_gives_empty_views() {
        let query = Query {
            range: Some(DateRange::new(date("2024-01-01"), date("2024-01-31"))),
            ..Query::default()
        };

        let views = dashboard().query(&query);

        assert!(views.is_empty());
        assert_eq!(views.dataset.count, 96);
        assert_eq!(views.summary.first, None);
        assert_eq!(views.summary.last, None);
        assert!(views.daily.is_empty());
        assert!(views.monthly.is_empty());
        assert!(views.yearly.is_empty());
        assert!(views.hourly.is_empty());
    }

    #[test]
    fn test_inverted_range_gives_empty_views() {
        let query = Query {
            range: Some(DateRange::new(date("2023-03-02"), date("2022-03-01"))),
            ..Query::default()
        };
        assert!(dashboard().query(&query).is_empty());
    }

    #[test]
    fn test_currency_switch_round_trip() {
        let dashboard = dashboard();
        let range = dashboard.default_range();
        let sek = Query {
            currency: Currency::Sek,
            range,
            ..Query::default()
        };
        let eur = Query {
            currency: Currency::Eur,
            ..sek
        };

        let first = dashboard.query(&sek);
        let switched = dashboard.query(&eur);
        let back = dashboard.query(&sek);

        assert_ne!(first.daily, switched.daily);
        assert_eq!(first, back);
    }

    #[test]
    fn test_queries_share_the_loaded_table() {
        let dashboard = dashboard();
        let table = dashboard.table();
        let _ = dashboard.query(&Query::default());
        assert!(Arc::ptr_eq(&table, &dashboard.table()));
        assert_eq!(table.len(), 96);
    }

    #[test]
    fn test_duplicate_timestamps_feed_the_means() {
        let repeated = date("2023-10-29").and_hms_opt(2, 0, 0).unwrap();
        let table = PriceTable::new(vec![
            PriceRecord {
                timestamp: repeated,
                price_sek: 10.0,
                price_eur: 1.0,
            },
            PriceRecord {
                timestamp: repeated,
                price_sek: 20.0,
                price_eur: 2.0,
            },
        ]);
        let dashboard = Dashboard::from_table(Arc::new(table));

        let views = dashboard.query(&Query::default());

        assert_eq!(views.summary.count, 2);
        assert_eq!(views.daily.get(&date("2023-10-29")), Some(15.0));
        assert_eq!(views.daily.buckets[0].count, 2);
        assert_eq!(views.hourly.get(2, 2023), Some(15.0));
    }
}
