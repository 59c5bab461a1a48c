mod calculation;
mod engine;
mod rates;
mod solver;
mod types;

pub use calculation::{CalculationError, run_calculation, summarize};
pub use engine::simulate;
pub use rates::{month_count, to_monthly_rate, to_months};
pub use solver::{solve_contribution, solve_duration, solve_duration_within};
pub use types::{
    CalculationMode, CalculationReport, DEFAULT_TARGET, DurationSpec, DurationUnit, EngineConfig,
    MAX_HORIZON_MONTHS, MONTHS_PER_YEAR, MonthlySample, RateSpec, RateUnit, ResultSummary,
    SAFETY_HORIZON_MONTHS, SimulationRequest, SimulationResult, YearlySample,
};
