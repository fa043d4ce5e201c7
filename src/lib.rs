pub mod cli;
pub mod core;

use crate::cli::{ui, views};
use crate::core::config::AppConfig;
use crate::core::{Currency, Dashboard, DateRange, Query};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Summary,
    Daily,
    Monthly,
    Yearly,
    Hourly,
}

impl From<AppCommand> for views::ViewKind {
    fn from(cmd: AppCommand) -> views::ViewKind {
        match cmd {
            AppCommand::Summary => views::ViewKind::All,
            AppCommand::Daily => views::ViewKind::Daily,
            AppCommand::Monthly => views::ViewKind::Monthly,
            AppCommand::Yearly => views::ViewKind::Yearly,
            AppCommand::Hourly => views::ViewKind::Hourly,
        }
    }
}

/// Per-run overrides; anything left `None` comes from the config file.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub data_path: Option<PathBuf>,
    pub currency: Option<Currency>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Missing bounds default to the first and last date in the data. Bounds
/// outside the data are kept as given.
fn resolve_range(
    dashboard: &Dashboard,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<DateRange> {
    let data_range = dashboard.default_range()?;
    let range = DateRange::new(
        start.unwrap_or(data_range.start),
        end.unwrap_or(data_range.end),
    );
    if !range.is_within(&data_range) {
        warn!(
            start = %range.start,
            end = %range.end,
            data_start = %data_range.start,
            data_end = %data_range.end,
            "Requested range extends beyond the available data"
        );
    }
    Some(range)
}

/// Loads the price file and renders the views for `cmd`.
pub fn render_command(
    cmd: AppCommand,
    options: &ViewOptions,
    config_path: Option<&str>,
) -> Result<String> {
    let config = load_config(config_path)?;
    let data_path = options.data_path.clone().unwrap_or_else(|| config.data_path());

    let pb = ui::new_spinner("Loading price data...");
    let dashboard = Dashboard::open(&data_path);
    pb.finish_and_clear();
    let dashboard = dashboard?;

    let query = Query {
        currency: options.currency.unwrap_or(config.currency),
        range: resolve_range(&dashboard, options.start, options.end),
        end_bound: config.end_bound,
        month_names: config.month_names,
    };
    info!(?cmd, ?query, "Rendering dashboard");

    let views = dashboard.query(&query);
    Ok(views::render(&views, cmd.into()))
}

pub fn run_command(
    cmd: AppCommand,
    options: &ViewOptions,
    config_path: Option<&str>,
) -> Result<()> {
    let output = render_command(cmd, options, config_path)?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PriceRecord, PriceTable};
    use std::sync::Arc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dashboard() -> Dashboard {
        let records = ["2023-01-01", "2023-01-31"]
            .into_iter()
            .map(|d| PriceRecord {
                timestamp: date(d).and_hms_opt(12, 0, 0).unwrap(),
                price_sek: 1.0,
                price_eur: 0.1,
            })
            .collect();
        Dashboard::from_table(Arc::new(PriceTable::new(records)))
    }

    #[test]
    fn test_resolve_range_defaults_to_data() {
        let range = resolve_range(&dashboard(), None, None).unwrap();
        assert_eq!(range, DateRange::new(date("2023-01-01"), date("2023-01-31")));

        let range = resolve_range(&dashboard(), Some(date("2023-01-10")), None).unwrap();
        assert_eq!(range, DateRange::new(date("2023-01-10"), date("2023-01-31")));
    }

    #[test_log::test]
    fn test_resolve_range_keeps_bounds_outside_data() {
        let range = resolve_range(
            &dashboard(),
            Some(date("2022-12-01")),
            Some(date("2023-02-28")),
        )
        .unwrap();

        assert_eq!(range, DateRange::new(date("2022-12-01"), date("2023-02-28")));
        assert!(!range.is_within(&dashboard().default_range().unwrap()));
    }
}
