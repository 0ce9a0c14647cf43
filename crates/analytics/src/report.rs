use crate::deriver::DerivedSeries;
use core_types::{ForecastRecord, KpiSummary, UnitScale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything one engine run produces for a dataset.
///
/// This struct is the final output of the `AnalyticsEngine` and the data
/// transfer object handed to whatever renders the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Unit that every MRR and ARR figure in the report is expressed in.
    pub unit_scale: UnitScale,
    pub growth_rate_pct: Decimal,

    // I. Historical series
    pub history: DerivedSeries,

    // II. Headline figures
    pub summary: KpiSummary,

    // III. Scenario projection
    pub forecast: Vec<ForecastRecord>,
}

impl AnalyticsReport {
    /// Creates the report for a dataset with no usable records.
    pub fn empty(unit_scale: UnitScale, growth_rate_pct: Decimal) -> Self {
        Self {
            unit_scale,
            growth_rate_pct,
            history: DerivedSeries::default(),
            summary: KpiSummary::empty(),
            forecast: Vec::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.history.is_empty()
    }
}
