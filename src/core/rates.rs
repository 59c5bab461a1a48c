use super::types::{DurationSpec, DurationUnit, MONTHS_PER_YEAR, RateSpec, RateUnit};

/// Converts a percentage rate into the effective monthly decimal rate.
///
/// Yearly rates are de-compounded with the twelfth root, so twelve months at
/// the returned rate reproduce the stated annual growth exactly.
pub fn to_monthly_rate(rate: RateSpec) -> f64 {
    let decimal = rate.value / 100.0;
    match rate.unit {
        RateUnit::Monthly => decimal,
        RateUnit::Yearly => (1.0 + decimal).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0,
    }
}

/// Length of `duration` in months, before truncation to whole months.
pub fn month_count(duration: DurationSpec) -> f64 {
    match duration.unit {
        DurationUnit::Years => duration.value * MONTHS_PER_YEAR as f64,
        DurationUnit::Months => duration.value,
    }
}

/// Number of whole months covered by `duration`.
///
/// The duration must fit in `u32` months; callers bound it with
/// [`month_count`] first.
pub fn to_months(duration: DurationSpec) -> u32 {
    let months = month_count(duration).floor();
    debug_assert!(
        months <= u32::MAX as f64,
        "duration of {months} months does not fit in u32"
    );
    // Negatives and NaN land on 0.
    months as u32
}
