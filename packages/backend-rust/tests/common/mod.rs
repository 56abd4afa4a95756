#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use flashdeck_algo::{EngineConfig, Item, Sentence};
use flashdeck_backend::db::{in_memory_pool, SnapshotStore};
use flashdeck_backend::services::ProgressService;
use flashdeck_backend::state::AppState;
use flashdeck_backend::vocabulary::Vocabulary;

pub const WORDS: &[(&str, &str)] = &[
    ("uno", "one"),
    ("dos", "two"),
    ("tres", "three; 3"),
    ("cuatro", "four"),
    ("cinco", "five"),
    ("seis", "six"),
];

pub fn test_vocabulary() -> Vocabulary {
    Vocabulary {
        words: WORDS
            .iter()
            .enumerate()
            .map(|(i, (source, target))| Item::new(i as u32, *source, *target))
            .collect(),
        sentences: vec![Sentence {
            source_text: "¡Uno, dos!".to_string(),
            target_text: "One, two!".to_string(),
        }],
    }
}

/// Small thresholds so a test can walk through promotion and locking quickly
pub fn test_engine_config() -> EngineConfig {
    EngineConfig {
        required_per_direction: 1,
        active_deck_size: 3,
        lock_milestone: 2,
        unlock_streak_required: 2,
    }
}

pub async fn create_test_app() -> Router {
    let pool = in_memory_pool().await.expect("in-memory sqlite");
    let progress = ProgressService::bootstrap(
        test_vocabulary(),
        test_engine_config(),
        Some(SnapshotStore::new(pool)),
    )
    .await;
    flashdeck_backend::build_app(AppState::new(progress))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// First accepted answer for a serialized word card, looked up in [`WORDS`]
/// since cards only carry the prompt
pub fn expected_answer(card: &Value) -> String {
    let id = card["itemId"].as_u64().unwrap() as usize;
    let (source, target) = WORDS[id];
    if card["direction"] == "sourceToTarget" {
        target.split(';').next().unwrap_or(target).trim().to_string()
    } else {
        source.to_string()
    }
}
