use std::fmt::{self, Write as _};
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    CalculationMode, CalculationReport, DEFAULT_TARGET, DurationSpec, DurationUnit, EngineConfig,
    MAX_HORIZON_MONTHS, RateSpec, RateUnit, SAFETY_HORIZON_MONTHS, SimulationRequest, month_count,
    run_calculation,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMode {
    Forward,
    SolveDuration,
    SolveContribution,
}

impl From<CliMode> for CalculationMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Forward => CalculationMode::Forward,
            CliMode::SolveDuration => CalculationMode::SolveDuration,
            CliMode::SolveContribution => CalculationMode::SolveContribution,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRateUnit {
    Yearly,
    Monthly,
}

impl From<CliRateUnit> for RateUnit {
    fn from(value: CliRateUnit) -> Self {
        match value {
            CliRateUnit::Yearly => RateUnit::Yearly,
            CliRateUnit::Monthly => RateUnit::Monthly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPeriodUnit {
    Years,
    Months,
}

impl From<CliPeriodUnit> for DurationUnit {
    fn from(value: CliPeriodUnit) -> Self {
        match value {
            CliPeriodUnit::Years => DurationUnit::Years,
            CliPeriodUnit::Months => DurationUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiMode {
    #[serde(alias = "standard", alias = "STANDARD")]
    Forward,
    #[serde(
        alias = "solveDuration",
        alias = "time-to-million",
        alias = "TIME_TO_MILLION"
    )]
    SolveDuration,
    #[serde(
        alias = "solveContribution",
        alias = "contribution-to-million",
        alias = "CONTRIBUTION_TO_MILLION"
    )]
    SolveContribution,
}

impl From<ApiMode> for CliMode {
    fn from(value: ApiMode) -> Self {
        match value {
            ApiMode::Forward => CliMode::Forward,
            ApiMode::SolveDuration => CliMode::SolveDuration,
            ApiMode::SolveContribution => CliMode::SolveContribution,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiRateType {
    #[serde(alias = "annual", alias = "year")]
    Yearly,
    #[serde(alias = "month")]
    Monthly,
}

impl From<ApiRateType> for CliRateUnit {
    fn from(value: ApiRateType) -> Self {
        match value {
            ApiRateType::Yearly => CliRateUnit::Yearly,
            ApiRateType::Monthly => CliRateUnit::Monthly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiPeriodType {
    #[serde(alias = "year")]
    Years,
    #[serde(alias = "month")]
    Months,
}

impl From<ApiPeriodType> for CliPeriodUnit {
    fn from(value: ApiPeriodType) -> Self {
        match value {
            ApiPeriodType::Years => CliPeriodUnit::Years,
            ApiPeriodType::Months => CliPeriodUnit::Months,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    mode: Option<ApiMode>,
    #[serde(alias = "initialCapital")]
    initial_value: Option<f64>,
    #[serde(alias = "monthlyContribution")]
    monthly_value: Option<f64>,
    #[serde(alias = "rate")]
    interest_rate: Option<f64>,
    #[serde(alias = "rateUnit")]
    rate_type: Option<ApiRateType>,
    period: Option<f64>,
    #[serde(alias = "periodUnit")]
    period_type: Option<ApiPeriodType>,
    target: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "million",
    about = "Compound interest simulator: project a balance, or solve for the time or monthly contribution needed to reach a target"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one calculation and print the result
    Calculate(CalculateArgs),
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    #[arg(
        long,
        env = "MILLION_SAFETY_HORIZON_MONTHS",
        default_value_t = SAFETY_HORIZON_MONTHS,
        help = "Longest duration, in months, the time-to-target solver will scan"
    )]
    safety_horizon_months: u32,
    #[arg(
        long,
        env = "MILLION_MAX_HORIZON_MONTHS",
        default_value_t = MAX_HORIZON_MONTHS,
        help = "Longest period, in months, a single calculation may simulate"
    )]
    max_horizon_months: u32,
    #[arg(
        long,
        env = "MILLION_DEFAULT_TARGET",
        default_value_t = DEFAULT_TARGET,
        help = "Target used by the solvers when a request does not name one"
    )]
    default_target: f64,
}

#[derive(Args, Debug, Clone)]
struct CalculateArgs {
    #[arg(long, value_enum, default_value_t = CliMode::Forward)]
    mode: CliMode,
    #[arg(long, default_value_t = 1000.0)]
    initial_capital: f64,
    #[arg(
        long,
        default_value_t = 500.0,
        help = "Contribution added at the end of every month; ignored by solve-contribution"
    )]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 10.0, help = "Interest rate in percent")]
    rate: f64,
    #[arg(long, value_enum, default_value_t = CliRateUnit::Yearly)]
    rate_unit: CliRateUnit,
    #[arg(long, default_value_t = 10.0, help = "Duration; ignored by solve-duration")]
    period: f64,
    #[arg(long, value_enum, default_value_t = CliPeriodUnit::Years)]
    period_unit: CliPeriodUnit,
    #[arg(long, help = "Target amount for the solvers, defaults to --default-target")]
    target: Option<f64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Clone)]
struct AppState {
    config: EngineConfig,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_engine_config(args: &EngineArgs) -> Result<EngineConfig, String> {
    if args.safety_horizon_months == 0 {
        return Err("--safety-horizon-months must be > 0".to_string());
    }
    if args.max_horizon_months == 0 {
        return Err("--max-horizon-months must be > 0".to_string());
    }
    if args.safety_horizon_months > args.max_horizon_months {
        return Err("--safety-horizon-months must be <= --max-horizon-months".to_string());
    }
    if !args.default_target.is_finite() || args.default_target <= 0.0 {
        return Err("--default-target must be > 0".to_string());
    }
    Ok(EngineConfig {
        safety_horizon_months: args.safety_horizon_months,
        max_horizon_months: args.max_horizon_months,
        default_target: args.default_target,
    })
}

fn build_request(args: &CalculateArgs, config: &EngineConfig) -> Result<SimulationRequest, String> {
    let mode: CalculationMode = args.mode.into();

    if !args.initial_capital.is_finite() || args.initial_capital < 0.0 {
        return Err("--initial-capital must be >= 0".to_string());
    }

    if mode != CalculationMode::SolveContribution
        && (!args.monthly_contribution.is_finite() || args.monthly_contribution < 0.0)
    {
        return Err("--monthly-contribution must be >= 0".to_string());
    }

    if !args.rate.is_finite() || args.rate < 0.0 {
        return Err("--rate cannot be negative".to_string());
    }

    if mode != CalculationMode::SolveDuration && (!args.period.is_finite() || args.period < 1.0) {
        return Err("--period must be >= 1".to_string());
    }

    let duration = DurationSpec {
        value: match mode {
            CalculationMode::SolveDuration => 0.0,
            _ => args.period,
        },
        unit: args.period_unit.into(),
    };
    if month_count(duration) >= config.max_horizon_months as f64 + 1.0 {
        return Err(format!(
            "--period must not exceed {} months",
            config.max_horizon_months
        ));
    }

    let target = args.target.unwrap_or(config.default_target);
    if !target.is_finite() || target <= 0.0 {
        return Err("--target must be > 0".to_string());
    }

    Ok(SimulationRequest {
        initial_capital: args.initial_capital,
        monthly_contribution: match mode {
            CalculationMode::SolveContribution => 0.0,
            _ => args.monthly_contribution,
        },
        rate: RateSpec {
            value: args.rate,
            unit: args.rate_unit.into(),
        },
        duration,
        mode,
        target,
    })
}

/// Entry point for the `million` binary.
pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Calculate(args) => {
            let config = build_engine_config(&args.engine)?;
            let request = build_request(&args, &config)?;
            info!("running {:?} calculation", request.mode);
            let report = run_calculation(&request, &config).map_err(|e| e.to_string())?;
            match args.output {
                OutputFormat::Table => print!(
                    "{}",
                    render_table(&report)
                        .map_err(|e| format!("Failed to render table: {e}"))?
                ),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&report)
                        .map_err(|e| format!("Failed to serialize report: {e}"))?
                ),
            }
            Ok(())
        }
        Command::Serve(args) => {
            let config = build_engine_config(&args.engine)?;
            run_http_server(args.port, config)
                .await
                .map_err(|e| format!("Server error: {e}"))
        }
    }
}

pub async fn run_http_server(port: u16, config: EngineConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(AppState { config });

    let listener = TcpListener::bind(addr).await?;
    info!("calculator HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/api/calculate");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state.config, payload)
}

async fn calculate_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state.config, payload)
}

fn calculate_handler_impl(config: &EngineConfig, payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload, config) {
        Ok(request) => request,
        Err(msg) => {
            warn!("rejected calculation request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match run_calculation(&request, config) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str, config: &EngineConfig) -> Result<SimulationRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload, config)
}

fn api_request_from_payload(
    payload: CalculatePayload,
    config: &EngineConfig,
) -> Result<SimulationRequest, String> {
    let mut args = default_args_for_api(config);

    if let Some(v) = payload.mode {
        args.mode = v.into();
    }
    if let Some(v) = payload.initial_value {
        args.initial_capital = v;
    }
    if let Some(v) = payload.monthly_value {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.interest_rate {
        args.rate = v;
    }
    if let Some(v) = payload.rate_type {
        args.rate_unit = v.into();
    }
    if let Some(v) = payload.period {
        args.period = v;
    }
    if let Some(v) = payload.period_type {
        args.period_unit = v.into();
    }
    if payload.target.is_some() {
        args.target = payload.target;
    }

    build_request(&args, config)
}

fn default_args_for_api(config: &EngineConfig) -> CalculateArgs {
    CalculateArgs {
        mode: CliMode::Forward,
        initial_capital: 1000.0,
        monthly_contribution: 500.0,
        rate: 10.0,
        rate_unit: CliRateUnit::Yearly,
        period: 10.0,
        period_unit: CliPeriodUnit::Years,
        target: None,
        output: OutputFormat::Json,
        engine: EngineArgs {
            safety_horizon_months: config.safety_horizon_months,
            max_horizon_months: config.max_horizon_months,
            default_target: config.default_target,
        },
    }
}

fn render_table(report: &CalculationReport) -> Result<String, fmt::Error> {
    let result = &report.result;
    let summary = &report.summary;
    let span = format!(
        "{} years and {} months",
        summary.horizon_years, summary.horizon_remainder_months
    );

    let mut out = String::new();
    match report.mode {
        CalculationMode::Forward => writeln!(
            out,
            "Total amount: {:.2} after {span}",
            result.total_amount
        ),
        CalculationMode::SolveDuration if report.target_reached => {
            writeln!(out, "Target {:.2} reached in {span}", report.target)
        }
        CalculationMode::SolveDuration => writeln!(
            out,
            "Target {:.2} not reached; balance after {span}: {:.2}",
            report.target, result.total_amount
        ),
        CalculationMode::SolveContribution => writeln!(
            out,
            "Monthly contribution needed: {:.2} to reach {:.2} in {span}",
            report.monthly_contribution, report.target
        ),
    }?;
    writeln!(out, "Total invested: {:.2}", result.total_invested)?;
    writeln!(out, "Total interest: {:.2}", result.total_interest)?;
    writeln!(
        out,
        "Return on invested: {:.0}%",
        summary.return_on_invested_pct
    )?;

    if !result.yearly.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{:>5} {:>16} {:>16} {:>16} {:>16} {:>16}",
            "Year", "Invested/yr", "Interest/yr", "Invested", "Interest", "Amount"
        )?;
        writeln!(out, "{}", "-".repeat(90))?;
        for year in &result.yearly {
            writeln!(
                out,
                "{:>5} {:>16.2} {:>16.2} {:>16.2} {:>16.2} {:>16.2}",
                year.year_index,
                year.invested_this_year,
                year.interest_this_year,
                year.cumulative_invested,
                year.cumulative_interest,
                year.balance,
            )?;
        }
    }
    Ok(out)
}
