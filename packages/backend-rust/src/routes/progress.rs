use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::response::SuccessResponse;
use crate::state::AppState;

pub async fn get_progress(State(state): State<AppState>) -> Response {
    SuccessResponse::json(state.progress().progress()).into_response()
}
