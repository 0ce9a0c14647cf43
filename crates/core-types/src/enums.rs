use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The display unit that MRR and ARR are expressed in.
///
/// Revenue for a national-scale subscription business is enormous in raw
/// currency units, so the historical dashboards reported it in trillions.
/// Whatever unit is chosen, MRR and ARR always share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum UnitScale {
    Units,
    Thousands,
    Millions,
    Billions,
    #[default]
    Trillions,
}

impl UnitScale {
    /// The amount raw revenue is divided by to land in this unit.
    pub fn divisor(&self) -> Decimal {
        match self {
            UnitScale::Units => Decimal::ONE,
            UnitScale::Thousands => Decimal::from(1_000u64),
            UnitScale::Millions => Decimal::from(1_000_000u64),
            UnitScale::Billions => Decimal::from(1_000_000_000u64),
            UnitScale::Trillions => Decimal::from(1_000_000_000_000u64),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitScale::Units => "units",
            UnitScale::Thousands => "thousands",
            UnitScale::Millions => "millions",
            UnitScale::Billions => "billions",
            UnitScale::Trillions => "trillions",
        }
    }
}

impl fmt::Display for UnitScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the period-average churn treats years whose churn rate is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum ChurnMeanPolicy {
    /// A single undefined year makes the whole average undefined.
    #[default]
    Propagate,
    /// Undefined years are left out of both the sum and the count.
    SkipUndefined,
}

impl ChurnMeanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnMeanPolicy::Propagate => "propagate",
            ChurnMeanPolicy::SkipUndefined => "skip_undefined",
        }
    }
}

impl fmt::Display for ChurnMeanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which record survives when a dataset lists the same year more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum DuplicateYearPolicy {
    /// The record appearing last in input order wins.
    #[default]
    KeepLast,
    /// The record appearing first in input order wins.
    KeepFirst,
}

impl DuplicateYearPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateYearPolicy::KeepLast => "keep_last",
            DuplicateYearPolicy::KeepFirst => "keep_first",
        }
    }
}

impl fmt::Display for DuplicateYearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input columns of a yearly record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Year,
    TotalCustomers,
    NewCustomers,
    ChurnedCustomers,
    AvgMonthlyPrice,
}

impl MetricField {
    pub const ALL: [MetricField; 5] = [
        MetricField::Year,
        MetricField::TotalCustomers,
        MetricField::NewCustomers,
        MetricField::ChurnedCustomers,
        MetricField::AvgMonthlyPrice,
    ];

    /// Fields without which a record cannot produce any revenue figure.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            MetricField::Year | MetricField::TotalCustomers | MetricField::AvgMonthlyPrice
        )
    }

    /// The column header used by dataset files.
    pub fn column(&self) -> &'static str {
        match self {
            MetricField::Year => "Year",
            MetricField::TotalCustomers => "Total_Customers",
            MetricField::NewCustomers => "New_Customers",
            MetricField::ChurnedCustomers => "Churned_Customers",
            MetricField::AvgMonthlyPrice => "Avg_Monthly_Price_USD",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_scale_divisors() {
        assert_eq!(UnitScale::Units.divisor(), Decimal::ONE);
        assert_eq!(UnitScale::Millions.divisor(), Decimal::from(1_000_000));
        assert_eq!(UnitScale::default(), UnitScale::Trillions);
        assert_eq!(
            UnitScale::Trillions.divisor(),
            UnitScale::Billions.divisor() * Decimal::from(1_000)
        );
    }

    #[test]
    fn test_display_matches_config_names() {
        assert_eq!(UnitScale::Trillions.to_string(), "trillions");
        assert_eq!(ChurnMeanPolicy::SkipUndefined.to_string(), "skip_undefined");
        assert_eq!(DuplicateYearPolicy::KeepFirst.to_string(), "keep_first");
        assert_eq!(
            serde_json::to_string(&DuplicateYearPolicy::KeepFirst).unwrap(),
            format!("\"{}\"", DuplicateYearPolicy::KeepFirst)
        );
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = MetricField::ALL.iter().filter(|f| f.is_required()).collect();
        assert_eq!(
            required,
            vec![&MetricField::Year, &MetricField::TotalCustomers, &MetricField::AvgMonthlyPrice]
        );
    }
}
