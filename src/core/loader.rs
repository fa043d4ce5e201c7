//! Reads the price history file into a [`PriceTable`].
use crate::core::price::{PriceRecord, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SEK_COLUMN: &str = "Price_sek";
pub const EUR_COLUMN: &str = "Price_eur";

// `%.f` also matches a missing fraction
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Reasons the price file could not be turned into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Invalid timestamp '{value}' on row {row} of {path}")]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },
    #[error("Invalid {column} value '{value}' on row {row} of {path}")]
    InvalidPrice {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("No price records found in {path}")]
    Empty { path: PathBuf },
}

/// Parses a timestamp, keeping the wall-clock part of any offset form.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_price(
    path: &Path,
    row: usize,
    column: &str,
    value: Option<&str>,
) -> Result<f32, LoadError> {
    let raw = value.unwrap_or("").trim();
    let invalid = || LoadError::InvalidPrice {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value: raw.to_string(),
    };
    let price: f32 = raw.parse().map_err(|_| invalid())?;
    if !price.is_finite() || price < 0.0 {
        return Err(invalid());
    }
    Ok(price)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Loads the whole file or fails; a partial table is never returned.
pub fn load_price_table<P: AsRef<Path>>(path: P) -> Result<PriceTable, LoadError> {
    let path = path.as_ref();
    debug!("Loading price data from {}", path.display());

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let headers = reader.headers().map_err(csv_error)?.clone();
    let missing = |column: &str| LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    };
    let sek_idx = find_column(&headers, SEK_COLUMN).ok_or_else(|| missing(SEK_COLUMN))?;
    let eur_idx = find_column(&headers, EUR_COLUMN).ok_or_else(|| missing(EUR_COLUMN))?;
    debug!(?headers, sek_idx, eur_idx, "Resolved price columns");

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row_number = i + 1;
        let row = row.map_err(csv_error)?;

        let raw_ts = row.get(0).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::InvalidTimestamp {
            path: path.to_path_buf(),
            row: row_number,
            value: raw_ts.to_string(),
        })?;

        records.push(PriceRecord {
            timestamp,
            price_sek: parse_price(path, row_number, SEK_COLUMN, row.get(sek_idx))?,
            price_eur: parse_price(path, row_number, EUR_COLUMN, row.get(eur_idx))?,
        });
    }

    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    if !records.is_sorted_by_key(|r| r.timestamp) {
        debug!("Price data is not sorted by timestamp, sorting");
    }
    let table = PriceTable::new(records);

    let duplicates = table
        .records()
        .windows(2)
        .filter(|w| w[0].timestamp == w[1].timestamp)
        .count();
    if duplicates > 0 {
        warn!(duplicates, "Price data contains duplicate timestamps");
    }

    info!(
        records = table.len(),
        first = ?table.first_timestamp(),
        last = ?table.last_timestamp(),
        "Loaded price data"
    );
    Ok(table)
}
