use serde::Serialize;

/// Goal used by both inverse solvers when the caller does not pick one.
pub const DEFAULT_TARGET: f64 = 1_000_000.0;

/// Upper bound on the duration solver's scan: 100 years.
pub const SAFETY_HORIZON_MONTHS: u32 = 1200;

/// Longest horizon a single calculation may simulate: 100 years.
pub const MAX_HORIZON_MONTHS: u32 = 1200;

pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    Yearly,
    Monthly,
}

/// Interest rate as entered, in percent per `unit`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RateSpec {
    pub value: f64,
    pub unit: RateUnit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Years,
    Months,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DurationSpec {
    pub value: f64,
    pub unit: DurationUnit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationMode {
    Forward,
    SolveDuration,
    SolveContribution,
}

#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub initial_capital: f64,
    /// Ignored by `SolveContribution`, which derives its own.
    pub monthly_contribution: f64,
    pub rate: RateSpec,
    /// Ignored by `SolveDuration`, which derives its own.
    pub duration: DurationSpec,
    pub mode: CalculationMode,
    pub target: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub safety_horizon_months: u32,
    pub max_horizon_months: u32,
    pub default_target: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safety_horizon_months: SAFETY_HORIZON_MONTHS,
            max_horizon_months: MAX_HORIZON_MONTHS,
            default_target: DEFAULT_TARGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySample {
    pub month_index: u32,
    pub year_index: u32,
    pub cumulative_invested: f64,
    pub interest_this_month: f64,
    pub cumulative_interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySample {
    pub year_index: u32,
    pub cumulative_invested: f64,
    pub cumulative_interest: f64,
    pub balance: f64,
    /// Year 1 also counts the opening deposit.
    pub invested_this_year: f64,
    pub interest_this_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_invested: f64,
    pub total_interest: f64,
    pub total_amount: f64,
    pub horizon_months: u32,
    pub monthly: Vec<MonthlySample>,
    pub yearly: Vec<YearlySample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub horizon_years: u32,
    pub horizon_remainder_months: u32,
    pub return_on_invested_pct: f64,
    pub invested_share_pct: f64,
    pub interest_share_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub mode: CalculationMode,
    pub target: f64,
    pub monthly_rate: f64,
    pub horizon_months: u32,
    pub monthly_contribution: f64,
    pub target_reached: bool,
    pub summary: ResultSummary,
    pub result: SimulationResult,
}
