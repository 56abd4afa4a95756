mod events;
mod health;
mod progress;
mod sessions;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/progress", get(progress::get_progress).fallback(fallback_handler))
        .route(
            "/api/sessions",
            post(sessions::start_session).fallback(fallback_handler),
        )
        .route(
            "/api/sessions/current",
            get(sessions::current_session)
                .delete(sessions::end_session)
                .fallback(fallback_handler),
        )
        .route(
            "/api/sessions/current/answer",
            post(sessions::submit_answer).fallback(fallback_handler),
        )
        .route("/api/words/:source", get(words::get_word).fallback(fallback_handler))
        .route("/api/events", get(events::stream_events).fallback(fallback_handler))
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
