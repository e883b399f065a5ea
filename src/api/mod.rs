use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Args;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{MAX_YEARS, PlanError, PlanResult, ScenarioInput, optimize_spending};

#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    #[arg(long, default_value_t = 50_000.0, help = "Annual income in the first year")]
    pub initial_income: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help = "Yearly wage increase in percent"
    )]
    pub wage_increase_pct: f64,
    #[arg(long, default_value_t = 1, help = "Planning horizon in years")]
    pub years: u32,
    #[arg(
        long,
        default_value_t = 100.0,
        help = "Credit limit as a percentage of annual income"
    )]
    pub initial_credit_pct: f64,
    #[arg(
        long,
        default_value_t = 100.0,
        help = "Share of the credit limit usable as a debt ceiling, in percent"
    )]
    pub max_credit_utilization: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        allow_negative_numbers = true,
        help = "Annual interest rate in percent, compounded monthly"
    )]
    pub interest_rate: f64,
    #[arg(
        long,
        default_value_t = 0.01,
        help = "Max change of the spending factor between consecutive months"
    )]
    pub max_diff: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Opening debt; negative values are savings"
    )]
    pub initial_debt: f64,
}

impl Default for ScenarioArgs {
    fn default() -> Self {
        Self {
            initial_income: 50_000.0,
            wage_increase_pct: 5.0,
            years: 1,
            initial_credit_pct: 100.0,
            max_credit_utilization: 100.0,
            interest_rate: 15.0,
            max_diff: 0.01,
            initial_debt: 0.0,
        }
    }
}

impl From<&ScenarioArgs> for ScenarioInput {
    fn from(args: &ScenarioArgs) -> Self {
        ScenarioInput {
            initial_income: args.initial_income,
            wage_increase_pct: args.wage_increase_pct,
            years: args.years,
            initial_credit_pct: args.initial_credit_pct,
            max_credit_utilization: args.max_credit_utilization,
            interest_rate: args.interest_rate,
            max_diff: args.max_diff,
            initial_debt: args.initial_debt,
        }
    }
}

/// Request body of the optimal-living endpoint. The web form posts every
/// field as a string, so numbers are accepted either way.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptimalLivingPayload {
    #[serde(deserialize_with = "lenient_f64")]
    initial_income: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    wage_increase_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_int")]
    years: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    initial_credit_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    max_credit_utilization: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    interest_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    max_diff: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    initial_debt: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}")))
        }
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match lenient_f64(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() => Ok(Some(v.trunc() as i64)),
        Some(v) => Err(de::Error::custom(format!("expected an integer, got {v}"))),
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[cfg(test)]
fn scenario_from_json(json: &str) -> Result<ScenarioInput, String> {
    let payload = serde_json::from_str::<OptimalLivingPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    scenario_from_payload(payload)
}

fn scenario_from_payload(payload: OptimalLivingPayload) -> Result<ScenarioInput, String> {
    let mut args = ScenarioArgs::default();

    if let Some(v) = payload.initial_income {
        args.initial_income = v;
    }
    if let Some(v) = payload.wage_increase_pct {
        args.wage_increase_pct = v;
    }
    if let Some(v) = payload.years {
        if !(1..=i64::from(MAX_YEARS)).contains(&v) {
            return Err(format!("years must be between 1 and {MAX_YEARS}"));
        }
        args.years = v as u32;
    }
    if let Some(v) = payload.initial_credit_pct {
        args.initial_credit_pct = v;
    }
    if let Some(v) = payload.max_credit_utilization {
        args.max_credit_utilization = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.max_diff {
        args.max_diff = v;
    }
    if let Some(v) = payload.initial_debt {
        args.initial_debt = v;
    }

    Ok(ScenarioInput::from(&args))
}

pub fn solve_to_json(args: &ScenarioArgs, pretty: bool) -> Result<String, String> {
    let plan = optimize_spending(&ScenarioInput::from(args)).map_err(|e| e.to_string())?;
    let result = PlanResult::from(plan);
    let json = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    json.map_err(|e| format!("failed to serialize result: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/optimal-living/",
            get(optimal_living_get_handler).post(optimal_living_post_handler),
        )
        .route(
            "/api/optimal-living",
            get(optimal_living_get_handler).post(optimal_living_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("optimal-living API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/api/optimal-living/");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn optimal_living_get_handler(Query(payload): Query<OptimalLivingPayload>) -> Response {
    optimal_living_handler_impl(payload).await
}

async fn optimal_living_post_handler(Json(payload): Json<OptimalLivingPayload>) -> Response {
    optimal_living_handler_impl(payload).await
}

async fn optimal_living_handler_impl(payload: OptimalLivingPayload) -> Response {
    let scenario = match scenario_from_payload(payload) {
        Ok(scenario) => scenario,
        Err(msg) => {
            warn!("rejected request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match optimize_spending(&scenario) {
        Ok(plan) => json_response(StatusCode::OK, PlanResult::from(plan)),
        Err(err) => {
            warn!("optimization failed for {scenario:?}: {err}");
            error_response(status_for_error(&err), &err.to_string())
        }
    }
}

fn status_for_error(err: &PlanError) -> StatusCode {
    match err {
        PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PlanError::Infeasible => StatusCode::UNPROCESSABLE_ENTITY,
        PlanError::Unbounded | PlanError::Solver(_) => StatusCode::INTERNAL_SERVER_ERROR,
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
