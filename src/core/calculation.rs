use log::debug;
use thiserror::Error;

use super::engine::simulate;
use super::rates::{month_count, to_monthly_rate, to_months};
use super::solver::{solve_contribution, solve_duration_within};
use super::types::{
    CalculationMode, CalculationReport, EngineConfig, MONTHS_PER_YEAR, ResultSummary,
    SimulationRequest, SimulationResult,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("target must be > 0")]
    NonPositiveTarget,
    #[error("period must cover at least one month to solve for a contribution")]
    ZeroHorizon,
    #[error("period of {months} months exceeds the {max} month limit")]
    HorizonTooLong { months: f64, max: u32 },
}

/// Validates `request`, runs the solver its mode calls for, and simulates
/// the resulting plan.
///
/// Solve-duration feeds the solved month count into the simulation;
/// solve-contribution feeds the solved monthly contribution.
pub fn run_calculation(
    request: &SimulationRequest,
    config: &EngineConfig,
) -> Result<CalculationReport, CalculationError> {
    validate_request(request)?;

    let monthly_rate = to_monthly_rate(request.rate);
    let (horizon_months, monthly_contribution) = match request.mode {
        CalculationMode::Forward => (
            bounded_months(request, config)?,
            request.monthly_contribution,
        ),
        CalculationMode::SolveDuration => {
            let months = solve_duration_within(
                request.initial_capital,
                request.monthly_contribution,
                monthly_rate,
                request.target,
                config.safety_horizon_months.min(config.max_horizon_months),
            );
            (months, request.monthly_contribution)
        }
        CalculationMode::SolveContribution => {
            let months = bounded_months(request, config)?;
            if months == 0 {
                return Err(CalculationError::ZeroHorizon);
            }
            let contribution =
                solve_contribution(request.initial_capital, monthly_rate, months, request.target);
            (months, contribution)
        }
    };

    debug!(
        "{:?}: rate {monthly_rate:.8}/month, {horizon_months} months, contribution {monthly_contribution:.2}",
        request.mode
    );

    let result = simulate(
        request.initial_capital,
        monthly_contribution,
        monthly_rate,
        horizon_months,
    );

    Ok(CalculationReport {
        mode: request.mode,
        target: request.target,
        monthly_rate,
        horizon_months,
        monthly_contribution,
        target_reached: result.total_amount >= request.target,
        summary: summarize(&result),
        result,
    })
}

pub fn summarize(result: &SimulationResult) -> ResultSummary {
    let (invested_share_pct, interest_share_pct) = if result.total_amount > 0.0 {
        (
            result.total_invested / result.total_amount * 100.0,
            result.total_interest / result.total_amount * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    ResultSummary {
        horizon_years: result.horizon_months / MONTHS_PER_YEAR,
        horizon_remainder_months: result.horizon_months % MONTHS_PER_YEAR,
        return_on_invested_pct: if result.total_invested > 0.0 {
            result.total_interest / result.total_invested * 100.0
        } else {
            0.0
        },
        invested_share_pct,
        interest_share_pct,
    }
}

fn bounded_months(
    request: &SimulationRequest,
    config: &EngineConfig,
) -> Result<u32, CalculationError> {
    let months = month_count(request.duration);
    if months >= config.max_horizon_months as f64 + 1.0 {
        return Err(CalculationError::HorizonTooLong {
            months,
            max: config.max_horizon_months,
        });
    }
    Ok(to_months(request.duration))
}

fn validate_request(request: &SimulationRequest) -> Result<(), CalculationError> {
    for (field, value) in [
        ("initial capital", request.initial_capital),
        ("monthly contribution", request.monthly_contribution),
        ("interest rate", request.rate.value),
        ("period", request.duration.value),
        ("target", request.target),
    ] {
        if !value.is_finite() {
            return Err(CalculationError::NonFinite { field });
        }
        if value < 0.0 {
            return Err(CalculationError::Negative { field });
        }
    }

    if request.target <= 0.0 {
        return Err(CalculationError::NonPositiveTarget);
    }
    Ok(())
}
