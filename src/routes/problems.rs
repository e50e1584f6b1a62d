use std::str::FromStr;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::history::{DayKey, TypeHistoryStats};
use crate::problems::{FormattedProblem, ProblemTypeInfo};
use crate::response::AppError;
use crate::services::RequestError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_types))
        .route("/:typeId", post(request_problem))
        .route("/:typeId/history/stats", get(history_stats))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/history/cleanup", post(run_cleanup))
}

async fn list_types(State(state): State<AppState>) -> Json<ProblemTypeListResponse> {
    Json(ProblemTypeListResponse {
        success: true,
        types: state.problem_service().catalog().list(),
    })
}

async fn request_problem(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
) -> Result<Json<ProblemResponse>, AppError> {
    let deadline = Instant::now() + state.config().request_timeout;
    let problem = state
        .problem_service()
        .request_problem(&type_id, Some(deadline))
        .map_err(request_error_response)?;

    Ok(Json(ProblemResponse {
        success: true,
        type_id,
        problem,
    }))
}

async fn history_stats(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
) -> Result<Json<HistoryStatsResponse>, AppError> {
    if state.problem_service().catalog().get(&type_id).is_none() {
        return Err(AppError::not_found(
            "UNKNOWN_PROBLEM_TYPE",
            format!("unknown problem type: {type_id}"),
        ));
    }

    Ok(Json(HistoryStatsResponse {
        success: true,
        stats: state.history().type_stats(&type_id),
    }))
}

async fn run_cleanup(
    State(state): State<AppState>,
    Query(params): Query<CleanupParams>,
) -> Result<Json<CleanupResponse>, AppError> {
    let today = match params.as_of.as_deref() {
        Some(raw) => DayKey::from_str(raw)
            .map_err(|err| AppError::bad_request("INVALID_DAY_KEY", err.to_string()))?
            .date(),
        None => Local::now().date_naive(),
    };

    let removed = state.problem_service().run_cleanup(today);
    Ok(Json(CleanupResponse {
        success: true,
        removed,
    }))
}

fn request_error_response(err: RequestError) -> AppError {
    match err {
        RequestError::UnknownProblemType(_) => {
            AppError::not_found("UNKNOWN_PROBLEM_TYPE", err.to_string())
        }
        RequestError::Exhausted { .. } => AppError::unavailable("EXHAUSTED", err.to_string()),
        RequestError::TimedOut => AppError::unavailable("TIMED_OUT", err.to_string()),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CleanupParams {
    as_of: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemTypeListResponse {
    success: bool,
    types: Vec<ProblemTypeInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemResponse {
    success: bool,
    type_id: String,
    problem: FormattedProblem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryStatsResponse {
    success: bool,
    stats: TypeHistoryStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CleanupResponse {
    success: bool,
    removed: usize,
}
