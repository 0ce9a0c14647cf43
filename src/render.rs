//! Terminal presentation of an `AnalyticsReport`.
//!
//! This is the only place numbers are rounded: revenue to six decimals
//! (figures are usually in trillions), churn to two, LTV to whole dollars.

use analytics::{AnalyticsReport, RejectedRecord};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::{DerivedMetricRecord, ForecastRecord, KpiSummary, UnitScale};
use rust_decimal::{Decimal, RoundingStrategy};

const UNDEFINED: &str = "n/a";

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

pub fn format_revenue(value: Decimal) -> String {
    fixed(value, 6)
}

pub fn format_churn(value: Option<Decimal>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| fixed(v, 2))
}

pub fn format_ltv(value: Option<Decimal>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| fixed(v, 0))
}

fn format_count(value: Option<Decimal>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| v.normalize().to_string())
}

fn numeric(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn kpi_table(summary: &KpiSummary, unit_scale: UnitScale) -> Table {
    let latest = summary
        .latest_year
        .map_or_else(|| "latest".to_string(), |year| year.to_string());

    let mut table = new_table(vec![
        format!("MRR {} (USD {})", latest, unit_scale),
        format!("ARR {} (USD {})", latest, unit_scale),
        format!("Mean churn over {} years (%)", summary.periods),
        format!("LTV {} (USD)", latest),
    ]);
    table.add_row(vec![
        numeric(format_revenue(summary.latest_mrr)),
        numeric(format_revenue(summary.latest_arr)),
        numeric(format_churn(summary.mean_churn_rate_pct)),
        numeric(format_ltv(summary.latest_ltv)),
    ]);
    table
}

pub fn history_table(records: &[DerivedMetricRecord], unit_scale: UnitScale) -> Table {
    let mut table = new_table(vec![
        "Year".to_string(),
        "Customers".to_string(),
        "New".to_string(),
        "Churned".to_string(),
        format!("MRR (USD {})", unit_scale),
        format!("ARR (USD {})", unit_scale),
        "Churn (%)".to_string(),
        "ARPU (USD)".to_string(),
        "LTV (USD)".to_string(),
    ]);

    for record in records {
        let source = &record.source;
        table.add_row(vec![
            Cell::new(source.year),
            numeric(format_count(Some(source.total_customers))),
            numeric(format_count(source.new_customers)),
            numeric(format_count(source.churned_customers)),
            numeric(format_revenue(record.mrr)),
            numeric(format_revenue(record.arr)),
            numeric(format_churn(record.churn_rate_pct)),
            numeric(fixed(record.arpu, 2)),
            numeric(format_ltv(record.ltv)),
        ]);
    }
    table
}

pub fn rejected_table(rejected: &[RejectedRecord]) -> Table {
    let mut table = new_table(vec!["Input row".to_string(), "Reason".to_string()]);
    for r in rejected {
        // Rows are reported 1-based, counting data rows only.
        table.add_row(vec![Cell::new(r.index + 1), Cell::new(r.reason)]);
    }
    table
}

pub fn forecast_table(forecast: &[ForecastRecord], growth_rate_pct: Decimal, unit_scale: UnitScale) -> Table {
    let mut table = new_table(vec![
        "Year".to_string(),
        format!("ARR scenario {}% (USD {})", growth_rate_pct.normalize(), unit_scale),
    ]);
    for point in forecast {
        table.add_row(vec![Cell::new(point.year), numeric(format_revenue(point.arr))]);
    }
    table
}

/// Renders every section of a report as plain text.
pub fn render_report(title: &str, report: &AnalyticsReport) -> String {
    let mut out = format!("{}\n\n", title);

    out.push_str(&kpi_table(&report.summary, report.unit_scale).to_string());
    out.push_str("\n\n");

    if report.has_data() {
        out.push_str("Key metrics (history)\n");
        out.push_str(&history_table(&report.history.records, report.unit_scale).to_string());
        out.push_str("\n\n");
    } else {
        out.push_str("No usable records in this dataset.\n\n");
    }

    if !report.history.rejected.is_empty() {
        out.push_str("Dropped rows\n");
        out.push_str(&rejected_table(&report.history.rejected).to_string());
        out.push_str("\n\n");
    }

    if report.forecast.is_empty() {
        out.push_str("No forecast available.\n");
    } else {
        out.push_str("ARR forecast\n");
        out.push_str(
            &forecast_table(&report.forecast, report.growth_rate_pct, report.unit_scale).to_string(),
        );
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{AnalyticsEngine, Forecaster, KpiSummarizer, MetricsDeriver};
    use core_types::{DuplicateYearPolicy, MetricField, RawRecord};
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_precision_formatting() {
        assert_eq!(format_revenue(dec!(0.0000012345)), "0.000001");
        assert_eq!(format_revenue(dec!(2)), "2.000000");
        assert_eq!(format_churn(Some(dec!(7.125))), "7.13");
        assert_eq!(format_ltv(Some(dec!(499.5))), "500");
        assert_eq!(format_ltv(None), "n/a");
    }

    #[test]
    fn test_empty_report_renders_placeholders() {
        let report = AnalyticsReport::empty(UnitScale::Trillions, dec!(5));
        let text = render_report("Nothing", &report);

        assert!(text.contains("No usable records"));
        assert!(text.contains("No forecast available."));
        assert!(text.contains("0.000000"));
    }

    #[test]
    fn test_report_lists_history_rejections_and_forecast() {
        let records = vec![
            RawRecord::new()
                .with(MetricField::Year, 2023)
                .with(MetricField::TotalCustomers, 1000)
                .with(MetricField::ChurnedCustomers, 100)
                .with(MetricField::AvgMonthlyPrice, 50),
            RawRecord::new()
                .with(MetricField::Year, 2024)
                .with(MetricField::TotalCustomers, 1000)
                .with(MetricField::AvgMonthlyPrice, "N/A"),
        ];
        let engine = AnalyticsEngine::new(
            MetricsDeriver::new(UnitScale::Units, DuplicateYearPolicy::KeepLast),
            KpiSummarizer::default(),
            Forecaster::new(2),
        );
        let report = engine.run(&records, dec!(10));
        let text = render_report("Demo", &report);

        assert!(text.contains("600000.000000"));
        assert!(text.contains("660000.000000"));
        assert!(text.contains("missing or non-numeric Avg_Monthly_Price_USD"));
        assert!(text.contains("ARR scenario 10%"));
    }
}
