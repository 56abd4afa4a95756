use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;

/// Mastery, SRS and deck placement of one word, looked up by its source text
pub async fn get_word(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Response, AppError> {
    let detail = state
        .progress()
        .item_detail(source.trim())
        .ok_or_else(|| AppError::not_found(format!("unknown word: {source}")))?;
    Ok(SuccessResponse::json(detail).into_response())
}
