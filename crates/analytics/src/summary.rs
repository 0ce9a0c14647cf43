use core_types::{ChurnMeanPolicy, DerivedMetricRecord, KpiSummary};
use rust_decimal::Decimal;

/// Reduces a derived series to the handful of headline figures shown on a
/// dashboard: the latest year's revenue and LTV, and the period-average churn.
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiSummarizer {
    churn_policy: ChurnMeanPolicy,
}

impl KpiSummarizer {
    pub fn new(churn_policy: ChurnMeanPolicy) -> Self {
        Self { churn_policy }
    }

    /// Summarizes a series.
    ///
    /// "Latest" is the record with the highest year; if several share it the
    /// last one encountered wins. The input does not need to be sorted. An
    /// empty series gives [`KpiSummary::empty`].
    pub fn summarize(&self, series: &[DerivedMetricRecord]) -> KpiSummary {
        let Some(latest) = latest_record(series) else {
            return KpiSummary::empty();
        };

        KpiSummary {
            latest_year: Some(latest.year()),
            latest_mrr: latest.mrr,
            latest_arr: latest.arr,
            mean_churn_rate_pct: self.mean_churn(series),
            latest_ltv: latest.ltv,
            periods: series.len(),
        }
    }

    fn mean_churn(&self, series: &[DerivedMetricRecord]) -> Option<Decimal> {
        let rates: Vec<Decimal> = match self.churn_policy {
            ChurnMeanPolicy::Propagate => series
                .iter()
                .map(|r| r.churn_rate_pct)
                .collect::<Option<Vec<_>>>()?,
            ChurnMeanPolicy::SkipUndefined => {
                series.iter().filter_map(|r| r.churn_rate_pct).collect()
            }
        };

        if rates.is_empty() {
            return None;
        }

        let sum = rates
            .iter()
            .try_fold(Decimal::ZERO, |acc, rate| acc.checked_add(*rate))?;
        sum.checked_div(Decimal::from(rates.len()))
    }
}

/// The record with the maximum year, preferring the last one on ties.
pub(crate) fn latest_record(series: &[DerivedMetricRecord]) -> Option<&DerivedMetricRecord> {
    series
        .iter()
        .reduce(|best, record| if record.year() >= best.year() { record } else { best })
}
