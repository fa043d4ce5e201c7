//! Terminal rendering of the dashboard views.
use super::ui;
use crate::core::analytics::{self, Pivot, Series};
use crate::core::{Currency, DashboardViews, Summary};
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment};

const BAR_WIDTH: usize = 40;

/// Which views to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    All,
    Daily,
    Monthly,
    Yearly,
    Hourly,
}

fn heading(title: &str, currency: Currency) -> String {
    ui::style_text(&format!("{title} [{currency}]"), ui::StyleType::Title)
}

fn pivot_table(pivot: &Pivot, index_name: &str) -> String {
    let mut table = ui::new_styled_table();

    let mut header = vec![ui::header_cell(index_name)];
    header.extend(pivot.columns.iter().map(|y| ui::header_cell(&y.to_string())));
    table.set_header(header);

    for row in &pivot.rows {
        let mut cells = vec![Cell::new(&row.label)];
        cells.extend(row.values.iter().map(|v| ui::price_cell(*v)));
        table.add_row(cells);
    }
    table.to_string()
}

fn span(summary: &Summary) -> String {
    let day = |ts: Option<chrono::NaiveDateTime>| {
        ts.map_or("N/A".to_string(), |t| t.date().to_string())
    };
    format!("{} to {}", day(summary.first), day(summary.last))
}

/// Filtered row count and period, followed by the whole dataset's.
pub fn render_summary(summary: &Summary, dataset: &Summary) -> String {
    format!(
        "{} {}\n{} {}\n{} {} points, {}",
        ui::style_text("Data points:", ui::StyleType::Label),
        ui::style_text(&summary.count.to_string(), ui::StyleType::Value),
        ui::style_text("Period:", ui::StyleType::Label),
        span(summary),
        ui::style_text("Dataset:", ui::StyleType::Subtle),
        dataset.count,
        span(dataset),
    )
}

pub fn render_daily(series: &Series<NaiveDate>, currency: Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Mean")]);
    for bucket in &series.buckets {
        table.add_row(vec![Cell::new(bucket.key), ui::price_cell(bucket.mean)]);
    }
    format!("{}\n\n{table}", heading("Daily average price", currency))
}

pub fn render_monthly(pivot: &Pivot, currency: Currency) -> String {
    format!(
        "{}\n\n{}\n{}",
        heading("Monthly average price", currency),
        pivot_table(pivot, "Month"),
        ui::style_text(
            "Each year is a separate column to compare months across years.",
            ui::StyleType::Subtle
        ),
    )
}

pub fn render_yearly(series: &Series<i32>, currency: Currency) -> String {
    let max = series.max_mean();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year end"),
        ui::header_cell("Mean"),
        ui::header_cell(""),
    ]);
    for bucket in &series.buckets {
        let label = analytics::year_end(bucket.key)
            .map_or(bucket.key.to_string(), |d| d.to_string());
        table.add_row(vec![
            Cell::new(label),
            ui::price_cell(bucket.mean),
            Cell::new(ui::bar(bucket.mean, max, BAR_WIDTH)).set_alignment(CellAlignment::Left),
        ]);
    }
    format!("{}\n\n{table}", heading("Yearly average price", currency))
}

pub fn render_hourly(pivot: &Pivot, currency: Currency) -> String {
    format!(
        "{}\n\n{}",
        heading("Hourly average price per year", currency),
        pivot_table(pivot, "Hour"),
    )
}

/// Renders the requested views followed by the data summary.
pub fn render(views: &DashboardViews, kind: ViewKind) -> String {
    if views.is_empty() {
        return format!(
            "{}\n\n{}",
            ui::style_text("No data in selected range", ui::StyleType::Error),
            render_summary(&views.summary, &views.dataset)
        );
    }

    let currency = views.currency;
    let sections = match kind {
        ViewKind::Daily => vec![render_daily(&views.daily, currency)],
        ViewKind::Monthly => vec![render_monthly(&views.monthly, currency)],
        ViewKind::Yearly => vec![render_yearly(&views.yearly, currency)],
        ViewKind::Hourly => vec![render_hourly(&views.hourly, currency)],
        ViewKind::All => vec![
            render_daily(&views.daily, currency),
            render_monthly(&views.monthly, currency),
            render_yearly(&views.yearly, currency),
            render_hourly(&views.hourly, currency),
        ],
    };

    let separator = format!("\n{}\n", ui::separator());
    let mut output = sections.join(separator.as_str());
    output.push_str(&format!("\n\n{}", render_summary(&views.summary, &views.dataset)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::{Bucket, MonthNames, PivotRow};

    fn views(count: usize) -> DashboardViews {
        let day = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        DashboardViews {
            currency: Currency::Eur,
            summary: Summary {
                count,
                first: day.and_hms_opt(0, 0, 0),
                last: day.and_hms_opt(23, 0, 0),
            },
            dataset: Summary {
                count: 96,
                first: NaiveDate::from_ymd_opt(2022, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
                last: day.and_hms_opt(23, 0, 0),
            },
            daily: Series {
                buckets: vec![Bucket {
                    key: day,
                    mean: Some(15.0),
                    count,
                }],
            },
            monthly: Pivot {
                columns: vec![2022, 2023],
                rows: vec![PivotRow {
                    key: 3,
                    label: MonthNames::Swedish.label(3),
                    values: vec![None, Some(15.0)],
                }],
            },
            yearly: Series {
                buckets: vec![Bucket {
                    key: 2023,
                    mean: Some(15.0),
                    count,
                }],
            },
            hourly: Pivot {
                columns: vec![2023],
                rows: vec![PivotRow {
                    key: 0,
                    label: "00".to_string(),
                    values: vec![Some(15.0)],
                }],
            },
        }
    }

    #[test]
    fn test_render_all_views() {
        let output = console::strip_ansi_codes(&render(&views(2), ViewKind::All)).to_string();

        assert!(output.contains("Daily average price [EUR]"));
        assert!(output.contains("Monthly average price [EUR]"));
        assert!(output.contains("Yearly average price [EUR]"));
        assert!(output.contains("Hourly average price per year [EUR]"));
        assert!(output.contains("03 Mars"));
        assert!(output.contains("2023-12-31"));
        assert!(output.contains("15.00"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Data points: 2"));
        assert!(output.contains("2023-03-01 to 2023-03-01"));
        assert!(output.contains("Dataset: 96 points, 2022-03-01 to 2023-03-01"));
    }

    #[test]
    fn test_render_single_view() {
        let output = console::strip_ansi_codes(&render(&views(2), ViewKind::Yearly)).to_string();

        assert!(output.contains("Yearly average price [EUR]"));
        assert!(!output.contains("Daily average price"));
        assert!(!output.contains("Monthly average price"));
    }

    #[test]
    fn test_render_empty_views() {
        let mut empty = views(0);
        empty.summary.first = None;
        empty.summary.last = None;

        let output = console::strip_ansi_codes(&render(&empty, ViewKind::All)).to_string();

        assert!(output.contains("No data in selected range"));
        assert!(output.contains("N/A to N/A"));
        assert!(output.contains("Dataset: 96 points"));
        assert!(!output.contains("Daily average price"));
    }
}
