use crate::summary::latest_record;
use core_types::{DerivedMetricRecord, ForecastRecord};
use rust_decimal::Decimal;

pub const DEFAULT_HORIZON: u32 = 5;

/// Projects annual recurring revenue forward at a constant growth rate.
///
/// Each projected year compounds on the previous projection, so year `i`
/// is `last_arr * (1 + g/100)^i`.
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    horizon: u32,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl Forecaster {
    pub fn new(horizon: u32) -> Self {
        Self { horizon }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Forecasts ARR for the `horizon` years following the latest year in
    /// `series`.
    ///
    /// The base is the ARR of the record with the highest year (last one on
    /// ties). Negative and zero growth are projected as given. An empty
    /// series gives an empty forecast.
    pub fn forecast(&self, series: &[DerivedMetricRecord], growth_rate_pct: Decimal) -> Vec<ForecastRecord> {
        let Some(base) = latest_record(series) else {
            return Vec::new();
        };
        self.project(base.year(), base.arr, growth_rate_pct)
    }

    /// Compounds `last_arr` forward from `last_year`.
    ///
    /// Always yields exactly `horizon` records. A value that leaves the
    /// decimal range is pinned at `Decimal::MAX` or `Decimal::MIN`, and a
    /// year past `i32::MAX` stays at `i32::MAX`.
    pub fn project(&self, last_year: i32, last_arr: Decimal, growth_rate_pct: Decimal) -> Vec<ForecastRecord> {
        // |g / 100| + 1 is always far inside the decimal range.
        let rate = Decimal::ONE + growth_rate_pct / Decimal::ONE_HUNDRED;

        let mut projection = Vec::with_capacity(self.horizon as usize);
        let mut arr = last_arr;
        let mut year = last_year;
        let mut saturated_from = None;

        for _ in 0..self.horizon {
            year = year.saturating_add(1);
            arr = match arr.checked_mul(rate) {
                Some(next) => next,
                None => {
                    saturated_from = saturated_from.or(Some(year));
                    saturate(arr, rate)
                }
            };
            projection.push(ForecastRecord { year, arr });
        }

        if let Some(year) = saturated_from {
            tracing::warn!(
                year,
                %last_arr,
                %growth_rate_pct,
                "Projected ARR left the decimal range; later years are pinned at the limit."
            );
        }
        tracing::debug!(
            last_year,
            %last_arr,
            %growth_rate_pct,
            horizon = self.horizon,
            "Projected ARR."
        );
        projection
    }
}

/// The range limit an overflowing `arr * rate` is heading towards.
fn saturate(arr: Decimal, rate: Decimal) -> Decimal {
    if arr.is_sign_negative() == rate.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_projection_compounds_on_previous_year() {
        let forecast = Forecaster::new(3).project(2024, dec!(1.0), dec!(10));

        let arr: Vec<Decimal> = forecast.iter().map(|f| f.arr).collect();
        assert_eq!(arr, vec![dec!(1.1), dec!(1.21), dec!(1.331)]);
        let years: Vec<i32> = forecast.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027]);
    }

    #[test]
    fn test_negative_growth_decays_without_clamping() {
        let forecast = Forecaster::new(2).project(2020, dec!(100), dec!(-150));

        assert_eq!(forecast[0].arr, dec!(-50));
        assert_eq!(forecast[1].arr, dec!(25));
    }

    #[test]
    fn test_zero_horizon_gives_empty_projection() {
        let forecast = Forecaster::new(0).project(2020, dec!(5), dec!(3));
        assert!(forecast.is_empty());
    }

    #[test]
    fn test_long_doubling_horizon_pins_at_decimal_max() {
        // 2^100 does not fit in a Decimal.
        let forecast = Forecaster::new(100).project(2024, dec!(1), dec!(100));

        assert_eq!(forecast.len(), 100);
        assert_eq!(forecast[0].arr, dec!(2));
        assert_eq!(forecast[99].year, 2124);
        assert_eq!(forecast[99].arr, Decimal::MAX);
    }

    #[test]
    fn test_huge_growth_rate_still_fills_the_horizon() {
        let forecast = Forecaster::new(3).project(2024, dec!(1000000000000), dec!(1000000000000));

        assert_eq!(forecast.len(), 3);
        assert!(forecast.iter().all(|f| f.arr > Decimal::ZERO));
        assert_eq!(forecast[2].arr, Decimal::MAX);
    }

    #[test]
    fn test_overflow_towards_negative_pins_at_decimal_min() {
        let forecast = Forecaster::new(2).project(2024, Decimal::MAX, dec!(-300));

        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].arr, Decimal::MIN);
    }

    #[test]
    fn test_year_saturates_at_i32_max() {
        let forecast = Forecaster::new(3).project(i32::MAX - 1, dec!(1), dec!(0));

        let years: Vec<i32> = forecast.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![i32::MAX, i32::MAX, i32::MAX]);
    }

    #[test]
    fn test_default_horizon_is_five_years() {
        assert_eq!(Forecaster::default().horizon(), 5);
    }
}
