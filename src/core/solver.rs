use log::warn;

use super::types::SAFETY_HORIZON_MONTHS;

/// Months until the balance first reaches `target`, capped at
/// [`SAFETY_HORIZON_MONTHS`].
pub fn solve_duration(
    initial_capital: f64,
    monthly_contribution: f64,
    monthly_rate: f64,
    target: f64,
) -> u32 {
    solve_duration_within(
        initial_capital,
        monthly_contribution,
        monthly_rate,
        target,
        SAFETY_HORIZON_MONTHS,
    )
}

/// Steps the same recurrence as [`super::simulate`] until `target` is met or
/// `horizon_months` is exhausted.
///
/// The scan is linear on purpose: feeding the returned month count back into
/// the simulator must land on the same side of the target, which only holds
/// when both apply identical floating point operations in the same order.
/// Returns 0 both when the target is already met and when it can never be
/// reached (no contribution and no growth).
pub fn solve_duration_within(
    initial_capital: f64,
    monthly_contribution: f64,
    monthly_rate: f64,
    target: f64,
    horizon_months: u32,
) -> u32 {
    if monthly_contribution <= 0.0 && initial_capital < target && monthly_rate <= 0.0 {
        return 0;
    }

    let mut current = initial_capital;
    let mut months = 0;
    while current < target && months < horizon_months {
        let interest = current * monthly_rate;
        current = current + interest + monthly_contribution;
        months += 1;
    }

    if current < target {
        warn!(
            "target {target:.2} not reached within {horizon_months} months (balance {current:.2})"
        );
    }
    months
}

/// Constant end-of-month contribution that grows `initial_capital` into
/// `target` over `horizon_months`.
///
/// Inverts `FV = P(1+r)^n + PMT((1+r)^n - 1)/r`. Returns 0 when the lump sum
/// alone already reaches the target. `horizon_months` must be positive;
/// callers reject a zero horizon before getting here.
pub fn solve_contribution(
    initial_capital: f64,
    monthly_rate: f64,
    horizon_months: u32,
    target: f64,
) -> f64 {
    let growth = (1.0 + monthly_rate).powf(horizon_months as f64);
    let remainder = target - initial_capital * growth;
    if remainder <= 0.0 {
        return 0.0;
    }

    if monthly_rate == 0.0 {
        return remainder / horizon_months as f64;
    }

    let annuity_factor = (growth - 1.0) / monthly_rate;
    remainder / annuity_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DEFAULT_TARGET, simulate};
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn duration_without_growth_is_linear() {
        assert_eq!(solve_duration(0.0, 1000.0, 0.0, DEFAULT_TARGET), 1000);
    }

    #[test]
    fn duration_short_circuits_when_target_is_unreachable() {
        assert_eq!(solve_duration(0.0, 0.0, 0.0, DEFAULT_TARGET), 0);
        assert_eq!(solve_duration(250_000.0, 0.0, 0.0, DEFAULT_TARGET), 0);
    }

    #[test]
    fn duration_is_zero_when_capital_already_meets_target() {
        assert_eq!(solve_duration(DEFAULT_TARGET, 0.0, 0.0, DEFAULT_TARGET), 0);
        assert_eq!(solve_duration(2_000_000.0, 500.0, 0.01, DEFAULT_TARGET), 0);
    }

    #[test]
    fn duration_stops_at_safety_horizon() {
        assert_eq!(
            solve_duration(0.0, 1.0, 0.0, DEFAULT_TARGET),
            SAFETY_HORIZON_MONTHS
        );
    }

    #[test]
    fn duration_honours_custom_horizon() {
        assert_eq!(solve_duration_within(0.0, 1.0, 0.0, DEFAULT_TARGET, 24), 24);
        assert_eq!(
            solve_duration_within(0.0, 1000.0, 0.0, DEFAULT_TARGET, 2400),
            1000
        );
    }

    #[test]
    fn duration_with_growth_only_still_iterates() {
        // 1% a month doubles in 70 months: 1.01^69 < 2 <= 1.01^70.
        assert_eq!(solve_duration(500_000.0, 0.0, 0.01, DEFAULT_TARGET), 70);
    }

    #[test]
    fn duration_round_trips_through_simulation() {
        for (initial, contribution, rate, target) in [
            (0.0, 100.0, 0.01, 1268.25),
            (10_000.0, 750.0, 0.0062, DEFAULT_TARGET),
            (0.0, 3.0, 0.0, 9.0),
            (999_999.0, 0.0, 0.0001, DEFAULT_TARGET),
        ] {
            let months = solve_duration(initial, contribution, rate, target);
            assert!(months > 0 && months < SAFETY_HORIZON_MONTHS);
            assert!(simulate(initial, contribution, rate, months).total_amount >= target);
            assert!(simulate(initial, contribution, rate, months - 1).total_amount < target);
        }
    }

    #[test]
    fn contribution_is_zero_when_lump_sum_suffices() {
        assert_eq!(solve_contribution(1_000_000.0, 0.01, 12, DEFAULT_TARGET), 0.0);
    }

    #[test]
    fn contribution_without_growth_divides_evenly() {
        let contribution = solve_contribution(100_000.0, 0.0, 120, DEFAULT_TARGET);
        assert_approx_tol(contribution, 7500.0, 1e-9);
    }

    #[test]
    fn contribution_inverts_ordinary_annuity() {
        let rate = 0.01;
        let contribution = solve_contribution(0.0, rate, 12, 1268.250_301_319_698);
        assert_approx_tol(contribution, 100.0, 1e-9);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_duration_is_first_month_crossing_target(
            initial in 0u32..900_000,
            contribution in 0u32..15_000,
            rate_bp in 0u32..200,
            target in 1_000u32..2_000_000
        ) {
            let (initial, contribution, target) = (initial as f64, contribution as f64, target as f64);
            let rate = rate_bp as f64 / 10_000.0;
            let months = solve_duration(initial, contribution, rate, target);
            let unreachable = contribution <= 0.0 && rate <= 0.0 && initial < target;
            if unreachable {
                prop_assert!(months == 0);
            }
            prop_assume!(!unreachable && months < SAFETY_HORIZON_MONTHS);

            let reached = simulate(initial, contribution, rate, months).total_amount >= target;
            prop_assert!(reached);

            if months > 0 {
                let before = simulate(initial, contribution, rate, months - 1);
                prop_assert!(before.total_amount < target);
            }
        }

        #[test]
        fn prop_solved_contribution_reaches_target(
            initial in 0u32..500_000,
            rate_bp in 0u32..200,
            months in 1u32..600,
            target in 10_000u32..3_000_000
        ) {
            let (initial, target) = (initial as f64, target as f64);
            let rate = rate_bp as f64 / 10_000.0;
            let contribution = solve_contribution(initial, rate, months, target);
            prop_assert!(contribution >= 0.0);

            let result = simulate(initial, contribution, rate, months);
            if contribution > 0.0 {
                prop_assert!((result.total_amount - target).abs() <= 1e-6 * target);
            } else {
                prop_assert!(result.total_amount >= target * (1.0 - 1e-9));
            }
        }
    }
}
