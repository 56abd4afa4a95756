use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use flashdeck_algo::{DirectionMode, SessionKind, SessionStats};

use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    kind: SessionKind,
    #[serde(default, alias = "directionMode")]
    direction: DirectionMode,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    answer: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndSessionResponse {
    ended: bool,
    stats: Option<SessionStats>,
}

pub async fn start_session(
    State(state): State<AppState>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|err| AppError::validation(err.body_text()))?;
    let session = state
        .progress()
        .start_session(request.kind, request.direction)?;
    Ok(SuccessResponse::json(session).into_response())
}

pub async fn current_session(State(state): State<AppState>) -> Result<Response, AppError> {
    let session = state
        .progress()
        .current_session()
        .ok_or_else(|| AppError::not_found("no practice session is running"))?;
    Ok(SuccessResponse::json(session).into_response())
}

pub async fn submit_answer(
    State(state): State<AppState>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|err| AppError::validation(err.body_text()))?;
    let outcome = state.progress().submit_answer(&request.answer).await?;
    Ok(SuccessResponse::json(outcome).into_response())
}

pub async fn end_session(State(state): State<AppState>) -> Response {
    let stats = state.progress().end_session();
    SuccessResponse::json(EndSessionResponse {
        ended: stats.is_some(),
        stats,
    })
    .into_response()
}
