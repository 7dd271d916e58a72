use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CalculationRequest, Feasibility, Plan, PlanOutcome, ProjectedSeries, Scenario,
    SCENARIO_SERIES_CAP_MONTHS, Tip, build_series, run_plan,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const GOAL_CAP: f64 = 100_000_000.0;
const HORIZON_CAP_MONTHS: u32 = 600;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTimeframeUnit {
    Months,
    Years,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTimeframeUnit {
    #[serde(alias = "month")]
    Months,
    #[serde(alias = "year")]
    Years,
}

impl From<ApiTimeframeUnit> for CliTimeframeUnit {
    fn from(value: ApiTimeframeUnit) -> Self {
        match value {
            ApiTimeframeUnit::Months => CliTimeframeUnit::Months,
            ApiTimeframeUnit::Years => CliTimeframeUnit::Years,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    Eur,
    Sek,
    Usd,
    Gbp,
    Nok,
    Dkk,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum ApiCurrency {
    #[serde(alias = "eur")]
    Eur,
    #[serde(alias = "sek")]
    Sek,
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "gbp")]
    Gbp,
    #[serde(alias = "nok")]
    Nok,
    #[serde(alias = "dkk")]
    Dkk,
}

impl From<CliCurrency> for ApiCurrency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Eur => ApiCurrency::Eur,
            CliCurrency::Sek => ApiCurrency::Sek,
            CliCurrency::Usd => ApiCurrency::Usd,
            CliCurrency::Gbp => ApiCurrency::Gbp,
            CliCurrency::Nok => ApiCurrency::Nok,
            CliCurrency::Dkk => ApiCurrency::Dkk,
        }
    }
}

impl From<ApiCurrency> for CliCurrency {
    fn from(value: ApiCurrency) -> Self {
        match value {
            ApiCurrency::Eur => CliCurrency::Eur,
            ApiCurrency::Sek => CliCurrency::Sek,
            ApiCurrency::Usd => CliCurrency::Usd,
            ApiCurrency::Gbp => CliCurrency::Gbp,
            ApiCurrency::Nok => CliCurrency::Nok,
            ApiCurrency::Dkk => CliCurrency::Dkk,
        }
    }
}

impl ApiCurrency {
    fn symbol(self) -> &'static str {
        match self {
            ApiCurrency::Eur => "€",
            ApiCurrency::Usd => "$",
            ApiCurrency::Gbp => "£",
            ApiCurrency::Sek | ApiCurrency::Nok | ApiCurrency::Dkk => "kr",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    goal: Option<f64>,
    current_savings: Option<f64>,
    timeframe: Option<f64>,
    timeframe_unit: Option<ApiTimeframeUnit>,
    roi: Option<f64>,
    monthly_expenses: Option<f64>,
    incomes: Option<Vec<f64>>,
    investing: Option<bool>,
    currency: Option<ApiCurrency>,
}

#[derive(Parser, Debug)]
#[command(
    name = "saveplan",
    about = "Savings goal planner (required payment, projection, what-if scenarios)"
)]
struct Cli {
    #[arg(long, default_value_t = 1_000_000.0, help = "Savings goal amount")]
    goal: f64,
    #[arg(long, default_value_t = 0.0, help = "Savings already set aside")]
    current_savings: f64,
    #[arg(
        long,
        default_value_t = 30.0,
        help = "Horizon length, interpreted per --timeframe-unit"
    )]
    timeframe: f64,
    #[arg(long, value_enum, default_value_t = CliTimeframeUnit::Years)]
    timeframe_unit: CliTimeframeUnit,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected annual return in percent, e.g. 5"
    )]
    roi: f64,
    #[arg(long, default_value_t = 2_000.0, help = "Total monthly expenses")]
    monthly_expenses: f64,
    #[arg(
        long = "income",
        num_args = 1..,
        default_values_t = [39_000.0],
        help = "Monthly income per earner; repeat for multiple earners"
    )]
    income: Vec<f64>,
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = true,
        help = "Apply the expected return; false plans with cash only"
    )]
    investing: bool,
    #[arg(long, value_enum, default_value_t = CliCurrency::Eur)]
    currency: CliCurrency,
}

/// Validated API request: the core calculation inputs plus the
/// display-only bits the response echoes back.
#[derive(Debug)]
struct PlanRequest {
    calc: CalculationRequest,
    currency: ApiCurrency,
    nominal_roi_percent: f64,
}

/// One what-if card: the scenario itself flattened alongside its own
/// projection series for charting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioCard {
    #[serde(flatten)]
    scenario: Scenario,
    series: ProjectedSeries,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    currency: ApiCurrency,
    currency_symbol: &'static str,
    goal: f64,
    current_savings: f64,
    months: u32,
    roi: f64,
    effective_roi: f64,
    investing: bool,
    total_income: f64,
    monthly_expenses: f64,
    progress_percent: f64,
    feasibility: Feasibility,
    plan: Plan,
    series: ProjectedSeries,
    scenarios: Vec<ScenarioCard>,
    tips: Vec<Tip>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn horizon_months(timeframe: f64, unit: CliTimeframeUnit) -> Result<u32, String> {
    if !timeframe.is_finite() || timeframe < 0.0 {
        return Err("--timeframe must be >= 0".to_string());
    }

    let months = match unit {
        CliTimeframeUnit::Months => timeframe.round(),
        CliTimeframeUnit::Years => (timeframe * 12.0).round(),
    };
    if months > HORIZON_CAP_MONTHS as f64 {
        return Err(format!(
            "--timeframe must not exceed {HORIZON_CAP_MONTHS} months"
        ));
    }
    Ok(months as u32)
}

fn build_request(cli: Cli) -> Result<PlanRequest, String> {
    if !cli.goal.is_finite() || !(0.0..=GOAL_CAP).contains(&cli.goal) {
        return Err(format!("--goal must be between 0 and {GOAL_CAP}"));
    }

    if !cli.current_savings.is_finite() || cli.current_savings < 0.0 {
        return Err("--current-savings must be >= 0".to_string());
    }

    if !cli.roi.is_finite() || !(-10.0..=30.0).contains(&cli.roi) {
        return Err("--roi must be between -10 and 30".to_string());
    }

    if !cli.monthly_expenses.is_finite() || cli.monthly_expenses < 0.0 {
        return Err("--monthly-expenses must be >= 0".to_string());
    }

    for income in &cli.income {
        if !income.is_finite() || *income < 0.0 {
            return Err("--income values must be >= 0".to_string());
        }
    }

    let months = horizon_months(cli.timeframe, cli.timeframe_unit)?;

    Ok(PlanRequest {
        calc: CalculationRequest {
            goal: cli.goal,
            current: cli.current_savings,
            months,
            annual_rate_percent: cli.roi,
            total_income: cli.income.iter().sum(),
            monthly_expenses: cli.monthly_expenses,
            investing_enabled: cli.investing,
        },
        currency: cli.currency.into(),
        nominal_roi_percent: cli.roi,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("SavePlan HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload).await
}

async fn plan_handler_impl(payload: PlanPayload) -> Response {
    let request = match request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let outcome = run_plan(&request.calc);
    json_response(StatusCode::OK, build_plan_response(&request, &outcome))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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
fn request_from_json(json: &str) -> Result<PlanRequest, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    request_from_payload(payload)
}

fn request_from_payload(payload: PlanPayload) -> Result<PlanRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.goal {
        cli.goal = v;
    }
    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }
    if let Some(v) = payload.timeframe {
        cli.timeframe = v;
    }
    if let Some(v) = payload.timeframe_unit {
        cli.timeframe_unit = v.into();
    }
    if let Some(v) = payload.roi {
        cli.roi = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.incomes {
        cli.income = v;
    }
    if let Some(v) = payload.investing {
        cli.investing = v;
    }
    if let Some(v) = payload.currency {
        cli.currency = v.into();
    }

    build_request(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        goal: 1_000_000.0,
        current_savings: 0.0,
        timeframe: 30.0,
        timeframe_unit: CliTimeframeUnit::Years,
        roi: 5.0,
        monthly_expenses: 2_000.0,
        income: vec![39_000.0],
        investing: true,
        currency: CliCurrency::Eur,
    }
}

/// Projection for one what-if card. Long horizons are clamped to the
/// display cap; the scenario's derived months are reported unclamped.
fn scenario_series(
    scenario: &Scenario,
    plan: &Plan,
    request: &CalculationRequest,
) -> ProjectedSeries {
    let rate = request.effective_rate_percent();
    let cap = |months: u32| months.clamp(1, SCENARIO_SERIES_CAP_MONTHS);

    match *scenario {
        Scenario::BoostContribution {
            new_monthly,
            derived_months,
            ..
        }
        | Scenario::CutExpenses {
            new_monthly,
            derived_months,
            ..
        }
        | Scenario::RoundUp {
            new_monthly,
            derived_months,
            ..
        }
        | Scenario::ExtraIncome {
            new_monthly,
            derived_months,
            ..
        } => build_series(
            request.current,
            new_monthly,
            rate,
            cap(derived_months),
            request.goal,
        ),
        Scenario::RaiseReturn {
            new_rate_percent,
            derived_months,
            ..
        } => build_series(
            request.current,
            plan.required_monthly,
            new_rate_percent,
            cap(derived_months),
            request.goal,
        ),
        Scenario::ExtendHorizon {
            new_months,
            new_monthly,
            ..
        } => build_series(
            request.current,
            new_monthly,
            rate,
            cap(new_months),
            request.goal,
        ),
    }
}

fn build_plan_response(request: &PlanRequest, outcome: &PlanOutcome) -> PlanResponse {
    let calc = &request.calc;
    let progress_percent = if calc.goal > 0.0 {
        (calc.current / calc.goal * 100.0).min(100.0)
    } else {
        0.0
    };

    let scenarios = outcome
        .scenarios
        .iter()
        .map(|scenario| ScenarioCard {
            scenario: *scenario,
            series: scenario_series(scenario, &outcome.plan, calc),
        })
        .collect();

    PlanResponse {
        currency: request.currency,
        currency_symbol: request.currency.symbol(),
        goal: calc.goal,
        current_savings: calc.current,
        months: calc.months,
        roi: request.nominal_roi_percent,
        effective_roi: calc.effective_rate_percent(),
        investing: calc.investing_enabled,
        total_income: calc.total_income,
        monthly_expenses: calc.monthly_expenses,
        progress_percent,
        feasibility: outcome.feasibility,
        plan: outcome.plan,
        series: outcome.series.clone(),
        scenarios,
        tips: outcome.tips.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeToGoal;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_request_converts_years_to_months() {
        let mut cli = sample_cli();
        cli.timeframe = 2.5;
        cli.timeframe_unit = CliTimeframeUnit::Years;

        let request = build_request(cli).expect("valid inputs");
        assert_eq!(request.calc.months, 30);
    }

    #[test]
    fn build_request_rounds_a_fractional_month_count() {
        let mut cli = sample_cli();
        cli.timeframe = 17.6;
        cli.timeframe_unit = CliTimeframeUnit::Months;

        let request = build_request(cli).expect("valid inputs");
        assert_eq!(request.calc.months, 18);
    }

    #[test]
    fn build_request_sums_income_earners() {
        let mut cli = sample_cli();
        cli.income = vec![30_000.0, 12_000.0, 500.0];

        let request = build_request(cli).expect("valid inputs");
        assert_approx(request.calc.total_income, 42_500.0);
    }

    #[test]
    fn build_request_rejects_a_goal_outside_the_cap() {
        let mut cli = sample_cli();
        cli.goal = -1.0;
        let err = build_request(cli).expect_err("must reject negative goal");
        assert!(err.contains("--goal"));

        let mut cli = sample_cli();
        cli.goal = 200_000_000.0;
        let err = build_request(cli).expect_err("must reject goal above cap");
        assert!(err.contains("--goal"));
    }

    #[test]
    fn build_request_rejects_out_of_range_roi() {
        let mut cli = sample_cli();
        cli.roi = 35.0;
        let err = build_request(cli).expect_err("must reject roi above 30");
        assert!(err.contains("--roi"));

        let mut cli = sample_cli();
        cli.roi = f64::NAN;
        let err = build_request(cli).expect_err("must reject non-finite roi");
        assert!(err.contains("--roi"));
    }

    #[test]
    fn build_request_rejects_a_horizon_beyond_the_cap() {
        let mut cli = sample_cli();
        cli.timeframe = 51.0;
        cli.timeframe_unit = CliTimeframeUnit::Years;

        let err = build_request(cli).expect_err("must reject > 600 months");
        assert!(err.contains("--timeframe"));
    }

    #[test]
    fn build_request_rejects_a_negative_income_earner() {
        let mut cli = sample_cli();
        cli.income = vec![30_000.0, -1.0];

        let err = build_request(cli).expect_err("must reject negative income");
        assert!(err.contains("--income"));
    }

    #[test]
    fn request_from_json_parses_web_keys() {
        let json = r#"{
          "goal": 500000,
          "currentSavings": 80000,
          "timeframe": 48,
          "timeframeUnit": "months",
          "roi": 6.5,
          "monthlyExpenses": 18000,
          "incomes": [30000, 12000],
          "investing": false,
          "currency": "SEK"
        }"#;
        let request = request_from_json(json).expect("json should parse");

        assert_approx(request.calc.goal, 500_000.0);
        assert_approx(request.calc.current, 80_000.0);
        assert_eq!(request.calc.months, 48);
        assert_approx(request.nominal_roi_percent, 6.5);
        assert_approx(request.calc.monthly_expenses, 18_000.0);
        assert_approx(request.calc.total_income, 42_000.0);
        assert!(!request.calc.investing_enabled);
        assert_approx(request.calc.effective_rate_percent(), 0.0);
        assert_eq!(request.currency, ApiCurrency::Sek);
        assert_eq!(request.currency.symbol(), "kr");
    }

    #[test]
    fn request_from_json_falls_back_to_defaults() {
        let request = request_from_json("{}").expect("empty payload uses defaults");
        assert_approx(request.calc.goal, 1_000_000.0);
        assert_eq!(request.calc.months, 360);
        assert_approx(request.calc.total_income, 39_000.0);
        assert!(request.calc.investing_enabled);
        assert_eq!(request.currency, ApiCurrency::Eur);
    }

    #[test]
    fn a_zero_goal_yields_a_neutral_response_rather_than_an_error() {
        let request = request_from_json(r#"{"goal": 0}"#).expect("zero goal is valid");
        let outcome = run_plan(&request.calc);
        let response = build_plan_response(&request, &outcome);

        assert_approx(response.plan.required_monthly, 0.0);
        assert_eq!(response.plan.months_to_goal, TimeToGoal::Months(0));
        assert_eq!(response.series.labels, vec!["Now".to_string()]);
        assert!(response.scenarios.is_empty());
        assert!(response.tips.is_empty());
        assert_approx(response.progress_percent, 0.0);
    }

    #[test]
    fn progress_is_clamped_at_one_hundred_percent() {
        let request = request_from_json(r#"{"goal": 10000, "currentSavings": 25000}"#)
            .expect("valid inputs");
        let outcome = run_plan(&request.calc);
        let response = build_plan_response(&request, &outcome);
        assert_approx(response.progress_percent, 100.0);
    }

    #[test]
    fn scenario_card_series_are_capped_for_display() {
        // Cash-only plan with a distant goal: the what-if horizons run far
        // past the display cap and must be clamped.
        let json = r#"{
          "goal": 2000000,
          "currentSavings": 0,
          "timeframe": 600,
          "timeframeUnit": "months",
          "investing": false,
          "incomes": [50000],
          "monthlyExpenses": 10000
        }"#;
        let request = request_from_json(json).expect("valid inputs");
        let outcome = run_plan(&request.calc);
        let response = build_plan_response(&request, &outcome);

        assert!(!response.scenarios.is_empty());
        for card in &response.scenarios {
            assert!(card.series.labels.len() <= SCENARIO_SERIES_CAP_MONTHS as usize + 1);
            assert_eq!(card.series.labels.len(), card.series.with_return.len());
        }
    }

    #[test]
    fn plan_response_serialization_contains_expected_fields() {
        let request = request_from_json(
            r#"{"goal": 300000, "currentSavings": 50000, "timeframe": 48, "timeframeUnit": "months", "incomes": [40000], "monthlyExpenses": 15000}"#,
        )
        .expect("valid inputs");
        let outcome = run_plan(&request.calc);
        let response = build_plan_response(&request, &outcome);
        let json = serde_json::to_string(&response).expect("response should serialize");

        assert!(json.contains("\"requiredMonthly\""));
        assert!(json.contains("\"monthsToGoal\""));
        assert!(json.contains("\"feasibility\""));
        assert!(json.contains("\"progressPercent\""));
        assert!(json.contains("\"currencySymbol\""));
        assert!(json.contains("\"withReturn\""));
        assert!(json.contains("\"withoutReturn\""));
        assert!(json.contains("\"goalLine\""));
        assert!(json.contains("\"scenarios\""));
        assert!(json.contains("\"kind\""));
        assert!(json.contains("\"tips\""));
        assert!(json.contains("\"effectiveRoi\""));
    }

    #[test]
    fn an_unreachable_time_to_goal_serializes_as_null() {
        let json = serde_json::to_string(&TimeToGoal::Unreachable).expect("serializes");
        assert_eq!(json, "null");
        let json = serde_json::to_string(&TimeToGoal::Months(42)).expect("serializes");
        assert_eq!(json, "42");
    }
}
