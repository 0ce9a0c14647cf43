use crate::coerce::{coerce, coerce_year};
use core_types::{
    DerivedMetricRecord, DuplicateYearPolicy, MetricField, RawRecord, UnitScale, YearlyRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Why an input record did not make it into the derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    /// A required field was absent or could not be coerced to a number.
    MissingField(MetricField),
    /// Another record for the same year was kept instead.
    DuplicateYear(i32),
    /// Revenue for the record does not fit the decimal range.
    Overflow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing or non-numeric {}", field),
            RejectReason::DuplicateYear(year) => write!(f, "duplicate year {}", year),
            RejectReason::Overflow => f.write_str("revenue out of range"),
        }
    }
}

/// An input record that was dropped, identified by its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: RejectReason,
}

/// The output of [`MetricsDeriver::derive`].
///
/// `records` is sorted ascending by year with one record per year.
/// `rejected` lists every dropped input record in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub records: Vec<DerivedMetricRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl DerivedSeries {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Cleans raw yearly records and derives the revenue and retention metrics
/// for each of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsDeriver {
    unit_scale: UnitScale,
    duplicate_years: DuplicateYearPolicy,
}

impl MetricsDeriver {
    pub fn new(unit_scale: UnitScale, duplicate_years: DuplicateYearPolicy) -> Self {
        Self {
            unit_scale,
            duplicate_years,
        }
    }

    pub fn unit_scale(&self) -> UnitScale {
        self.unit_scale
    }

    /// Derives the metric series for a dataset.
    ///
    /// Records missing a year, a customer count or a price after coercion
    /// are dropped. An empty input, or one where every record is dropped,
    /// yields an empty series.
    pub fn derive(&self, records: &[RawRecord]) -> DerivedSeries {
        let mut kept = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (index, raw) in records.iter().enumerate() {
            match clean(raw).and_then(|yearly| self.derive_record(yearly)) {
                Ok(record) => kept.push((index, record)),
                Err(reason) => {
                    tracing::debug!(index, %reason, "Dropping input record.");
                    rejected.push(RejectedRecord { index, reason });
                }
            }
        }

        // Stable, so records sharing a year stay in input order.
        kept.sort_by_key(|(_, record)| record.year());
        let records = self.resolve_duplicates(kept, &mut rejected);
        rejected.sort_by_key(|r| r.index);

        DerivedSeries { records, rejected }
    }

    /// Computes MRR, ARR, churn, ARPU and LTV for one cleaned record.
    fn derive_record(&self, yearly: YearlyRecord) -> Result<DerivedMetricRecord, RejectReason> {
        let mrr = scaled_revenue(
            yearly.total_customers,
            yearly.avg_monthly_price,
            self.unit_scale.divisor(),
        )
        .ok_or(RejectReason::Overflow)?;
        let arr = mrr
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(RejectReason::Overflow)?;

        let churn_rate_pct = churn_rate_pct(yearly.churned_customers, yearly.total_customers);
        let ltv = churn_rate_pct.and_then(|churn| lifetime_value(yearly.avg_monthly_price, churn));
        let arpu = yearly.avg_monthly_price;

        Ok(DerivedMetricRecord {
            source: yearly,
            mrr,
            arr,
            churn_rate_pct,
            arpu,
            ltv,
        })
    }

    /// Collapses runs of equal years in a year-sorted list down to one record.
    fn resolve_duplicates(
        &self,
        sorted: Vec<(usize, DerivedMetricRecord)>,
        rejected: &mut Vec<RejectedRecord>,
    ) -> Vec<DerivedMetricRecord> {
        let mut unique: Vec<(usize, DerivedMetricRecord)> = Vec::with_capacity(sorted.len());

        for (index, record) in sorted {
            let year = record.year();
            let duplicate = unique.last().is_some_and(|(_, kept)| kept.year() == year);
            if !duplicate {
                unique.push((index, record));
                continue;
            }

            let reason = RejectReason::DuplicateYear(year);
            match self.duplicate_years {
                DuplicateYearPolicy::KeepFirst => {
                    rejected.push(RejectedRecord { index, reason });
                }
                DuplicateYearPolicy::KeepLast => {
                    if let Some((kept_index, kept)) = unique.last_mut() {
                        rejected.push(RejectedRecord { index: *kept_index, reason });
                        *kept_index = index;
                        *kept = record;
                    }
                }
            }
            tracing::debug!(year, policy = %self.duplicate_years, "Resolved duplicate year.");
        }

        unique.into_iter().map(|(_, record)| record).collect()
    }
}

/// Coerces every field of a raw record and checks the required ones.
fn clean(raw: &RawRecord) -> Result<YearlyRecord, RejectReason> {
    let missing = RejectReason::MissingField;

    let year = coerce_year(raw.get(MetricField::Year)).ok_or(missing(MetricField::Year))?;
    let total_customers = coerce(raw.get(MetricField::TotalCustomers))
        .ok_or(missing(MetricField::TotalCustomers))?;
    let avg_monthly_price = coerce(raw.get(MetricField::AvgMonthlyPrice))
        .ok_or(missing(MetricField::AvgMonthlyPrice))?;

    Ok(YearlyRecord {
        year,
        total_customers,
        new_customers: coerce(raw.get(MetricField::NewCustomers)),
        churned_customers: coerce(raw.get(MetricField::ChurnedCustomers)),
        avg_monthly_price,
    })
}

/// `customers * price / divisor`. Multiplies first for exactness and only
/// scales the price down first when the raw product leaves the decimal range.
fn scaled_revenue(customers: Decimal, price: Decimal, divisor: Decimal) -> Option<Decimal> {
    customers
        .checked_mul(price)
        .and_then(|revenue| revenue.checked_div(divisor))
        .or_else(|| {
            price
                .checked_div(divisor)
                .and_then(|scaled| scaled.checked_mul(customers))
        })
}

/// Churned customers as a percentage of the customer base.
fn churn_rate_pct(churned: Option<Decimal>, total: Decimal) -> Option<Decimal> {
    if total.is_zero() {
        return None;
    }
    churned?.checked_div(total)?.checked_mul(ONE_HUNDRED)
}

/// Simplified lifetime value: monthly price over the churn fraction.
fn lifetime_value(price: Decimal, churn_rate_pct: Decimal) -> Option<Decimal> {
    let churn_fraction = churn_rate_pct.checked_div(ONE_HUNDRED)?;
    if churn_fraction.is_zero() {
        return None;
    }
    price.checked_div(churn_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(year: i64, total: &str, churned: &str, price: &str) -> RawRecord {
        RawRecord::new()
            .with(MetricField::Year, year)
            .with(MetricField::TotalCustomers, total)
            .with(MetricField::ChurnedCustomers, churned)
            .with(MetricField::AvgMonthlyPrice, price)
    }

    fn units() -> MetricsDeriver {
        MetricsDeriver::new(UnitScale::Units, DuplicateYearPolicy::KeepLast)
    }

    #[test]
    fn test_derives_revenue_and_retention_metrics() {
        let series = units().derive(&[raw(2020, "1000", "100", "50")]);

        assert_eq!(series.len(), 1);
        let record = &series.records[0];
        assert_eq!(record.mrr, dec!(50000));
        assert_eq!(record.arr, dec!(600000));
        assert_eq!(record.churn_rate_pct, Some(dec!(10)));
        assert_eq!(record.arpu, dec!(50));
        assert_eq!(record.ltv, Some(dec!(500)));
    }

    #[test]
    fn test_default_scale_is_trillions() {
        let series = MetricsDeriver::default().derive(&[raw(2020, "2000000000", "0", "500")]);

        // 2e9 customers * 500 = 1e12 per month
        assert_eq!(series.records[0].mrr, dec!(1));
        assert_eq!(series.records[0].arr, dec!(12));
    }

    #[test]
    fn test_zero_denominators_leave_metrics_undefined() {
        let series = units().derive(&[raw(2020, "0", "10", "50"), raw(2021, "100", "0", "50")]);

        assert_eq!(series.records[0].churn_rate_pct, None);
        assert_eq!(series.records[0].ltv, None);
        assert_eq!(series.records[1].churn_rate_pct, Some(dec!(0)));
        assert_eq!(series.records[1].ltv, None);
    }

    #[test]
    fn test_missing_churned_customers_is_tolerated() {
        let record = RawRecord::new()
            .with(MetricField::Year, 2020)
            .with(MetricField::TotalCustomers, 10)
            .with(MetricField::AvgMonthlyPrice, 3);
        let series = units().derive(&[record]);

        assert_eq!(series.len(), 1);
        assert_eq!(series.records[0].churn_rate_pct, None);
        assert_eq!(series.records[0].mrr, dec!(30));
    }

    #[test]
    fn test_rejects_records_missing_required_fields() {
        let no_year = RawRecord::new()
            .with(MetricField::TotalCustomers, 10)
            .with(MetricField::AvgMonthlyPrice, 3);
        let series = units().derive(&[
            raw(2019, "10", "1", "N/A"),
            no_year,
            raw(2020, "unknown", "1", "5"),
            raw(2021, "10", "1", "5"),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(
            series.rejected,
            vec![
                RejectedRecord { index: 0, reason: RejectReason::MissingField(MetricField::AvgMonthlyPrice) },
                RejectedRecord { index: 1, reason: RejectReason::MissingField(MetricField::Year) },
                RejectedRecord { index: 2, reason: RejectReason::MissingField(MetricField::TotalCustomers) },
            ]
        );
    }

    #[test]
    fn test_output_is_sorted_by_year() {
        let series = units().derive(&[
            raw(2022, "10", "1", "5"),
            raw(2020, "10", "1", "5"),
            raw(2021, "10", "1", "5"),
        ]);

        let years: Vec<i32> = series.records.iter().map(|r| r.year()).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_duplicate_years_keep_last_by_default() {
        let series = units().derive(&[
            raw(2020, "10", "1", "5"),
            raw(2021, "10", "1", "5"),
            raw(2020, "20", "1", "5"),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.records[0].source.total_customers, dec!(20));
        assert_eq!(
            series.rejected,
            vec![RejectedRecord { index: 0, reason: RejectReason::DuplicateYear(2020) }]
        );
    }

    #[test]
    fn test_duplicate_years_keep_first() {
        let deriver = MetricsDeriver::new(UnitScale::Units, DuplicateYearPolicy::KeepFirst);
        let series = deriver.derive(&[
            raw(2020, "10", "1", "5"),
            raw(2020, "20", "1", "5"),
            raw(2020, "30", "1", "5"),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(series.records[0].source.total_customers, dec!(10));
        assert_eq!(series.rejected.len(), 2);
        assert_eq!(series.rejected[1].index, 2);
    }

    #[test]
    fn test_revenue_overflow_is_rejected() {
        let huge = "79228162514264337593543950335";
        let series = units().derive(&[raw(2020, huge, "1", "2")]);

        assert!(series.is_empty());
        assert_eq!(series.rejected[0].reason, RejectReason::Overflow);
    }

    #[test]
    fn test_large_inputs_fit_once_scaled() {
        let quadrillion = "1000000000000000";
        let series = MetricsDeriver::default().derive(&[raw(2024, quadrillion, "0", quadrillion)]);

        // 1e30 per month overflows before scaling; 1e18 trillions does not.
        assert!(series.rejected.is_empty());
        assert_eq!(series.records[0].mrr, dec!(1000000000000000000));
        assert_eq!(series.records[0].arr, dec!(12000000000000000000));
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        let series = units().derive(&[]);
        assert!(series.is_empty());
        assert!(series.rejected.is_empty());
    }
}
