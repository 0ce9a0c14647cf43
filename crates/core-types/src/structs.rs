use crate::enums::MetricField;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single loosely-typed cell handed over by whatever produced the dataset.
///
/// Spreadsheets and CSV exports routinely carry numbers as text, often with
/// currency symbols or thousands separators, so text is a first-class
/// variant rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// One uncleaned row of a dataset: a year of activity for one business model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub year: Option<RawValue>,
    pub total_customers: Option<RawValue>,
    pub new_customers: Option<RawValue>,
    pub churned_customers: Option<RawValue>,
    pub avg_monthly_price: Option<RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and programmatic callers.
    pub fn with(mut self, field: MetricField, value: impl Into<RawValue>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    pub fn get(&self, field: MetricField) -> Option<&RawValue> {
        match field {
            MetricField::Year => self.year.as_ref(),
            MetricField::TotalCustomers => self.total_customers.as_ref(),
            MetricField::NewCustomers => self.new_customers.as_ref(),
            MetricField::ChurnedCustomers => self.churned_customers.as_ref(),
            MetricField::AvgMonthlyPrice => self.avg_monthly_price.as_ref(),
        }
    }

    fn slot_mut(&mut self, field: MetricField) -> &mut Option<RawValue> {
        match field {
            MetricField::Year => &mut self.year,
            MetricField::TotalCustomers => &mut self.total_customers,
            MetricField::NewCustomers => &mut self.new_customers,
            MetricField::ChurnedCustomers => &mut self.churned_customers,
            MetricField::AvgMonthlyPrice => &mut self.avg_monthly_price,
        }
    }
}

/// A raw record after coercion, holding every required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: i32,
    pub total_customers: Decimal,
    pub new_customers: Option<Decimal>,
    pub churned_customers: Option<Decimal>,
    pub avg_monthly_price: Decimal,
}

/// A cleaned yearly record together with the metrics derived from it.
///
/// `churn_rate_pct` and `ltv` are `None` when their denominator is zero or
/// their inputs are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetricRecord {
    #[serde(flatten)]
    pub source: YearlyRecord,
    pub mrr: Decimal,
    pub arr: Decimal,
    pub churn_rate_pct: Option<Decimal>, // Option<> because total_customers can be 0
    pub arpu: Decimal,
    pub ltv: Option<Decimal>, // Option<> because churn can be 0 or undefined
}

impl DerivedMetricRecord {
    pub fn year(&self) -> i32 {
        self.source.year
    }
}

/// Headline figures for a derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Year the "latest" figures were taken from; `None` for an empty series.
    pub latest_year: Option<i32>,
    pub latest_mrr: Decimal,
    pub latest_arr: Decimal,
    pub mean_churn_rate_pct: Option<Decimal>,
    pub latest_ltv: Option<Decimal>,
    /// Number of yearly records the summary was computed over.
    pub periods: usize,
}

impl KpiSummary {
    /// The neutral summary reported when there is no data at all.
    ///
    /// Every scalar is a defined zero so callers can render it unconditionally.
    pub fn empty() -> Self {
        Self {
            latest_year: None,
            latest_mrr: Decimal::ZERO,
            latest_arr: Decimal::ZERO,
            mean_churn_rate_pct: Some(Decimal::ZERO),
            latest_ltv: Some(Decimal::ZERO),
            periods: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods == 0
    }
}

impl Default for KpiSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// One projected year of annual recurring revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub year: i32,
    pub arr: Decimal,
}
