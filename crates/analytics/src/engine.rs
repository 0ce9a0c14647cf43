use crate::deriver::MetricsDeriver;
use crate::forecast::Forecaster;
use crate::report::AnalyticsReport;
use crate::summary::KpiSummarizer;
use core_types::RawRecord;
use rust_decimal::Decimal;

/// A stateless pipeline from raw yearly records to a complete `AnalyticsReport`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsEngine {
    deriver: MetricsDeriver,
    summarizer: KpiSummarizer,
    forecaster: Forecaster,
}

impl AnalyticsEngine {
    pub fn new(deriver: MetricsDeriver, summarizer: KpiSummarizer, forecaster: Forecaster) -> Self {
        Self {
            deriver,
            summarizer,
            forecaster,
        }
    }

    /// The main entry point for analysing a dataset.
    ///
    /// # Arguments
    ///
    /// * `records` - The uncleaned yearly records of one business model.
    /// * `growth_rate_pct` - Annual ARR growth for the scenario, in percent.
    ///
    /// # Returns
    ///
    /// The `AnalyticsReport`. Nothing here fails: unusable records are listed
    /// as rejected, no data gives an empty report, and out-of-range
    /// projections are pinned at the decimal limits.
    pub fn run(&self, records: &[RawRecord], growth_rate_pct: Decimal) -> AnalyticsReport {
        let unit_scale = self.deriver.unit_scale();
        let history = self.deriver.derive(records);

        tracing::info!(
            input = records.len(),
            retained = history.len(),
            rejected = history.rejected.len(),
            "Derived metric series."
        );

        if history.is_empty() {
            // Nothing survived cleaning; keep the rejections so callers can see why.
            let mut report = AnalyticsReport::empty(unit_scale, growth_rate_pct);
            report.history = history;
            return report;
        }

        let summary = self.summarizer.summarize(&history.records);
        let forecast = self.forecaster.forecast(&history.records, growth_rate_pct);

        AnalyticsReport {
            unit_scale,
            growth_rate_pct,
            history,
            summary,
            forecast,
        }
    }
}
