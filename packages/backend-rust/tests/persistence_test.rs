use std::net::{IpAddr, Ipv4Addr};

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;

use flashdeck_backend::config::Config;

mod common;

use common::{expected_answer, send, test_engine_config};

fn config_in(dir: &TempDir) -> Config {
    let words_path = dir.path().join("words.json");
    let words: Vec<_> = common::WORDS
        .iter()
        .map(|(source, target)| json!({"spanish": source, "english": target}))
        .collect();
    std::fs::write(&words_path, serde_json::to_string(&words).unwrap()).unwrap();

    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "info".to_string(),
        log_dir: None,
        database_path: dir.path().join("nested").join("data.db"),
        words_path,
        sentences_path: dir.path().join("missing-sentences.json"),
        engine: test_engine_config(),
    }
}

#[tokio::test]
async fn test_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    {
        let app = flashdeck_backend::create_app(&config).await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({"kind": "active", "direction": "targetToSource"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let card = body["data"]["card"].clone();
        let (_, body) = send(
            &app,
            "POST",
            "/api/sessions/current/answer",
            Some(json!({"answer": expected_answer(&card)})),
        )
        .await;
        assert_eq!(body["data"]["correct"], true);
    }

    assert!(dir.path().join("nested").join("data.db").exists());

    let app = flashdeck_backend::create_app(&config).await;
    let (_, body) = send(&app, "GET", "/api/progress", None).await;
    assert_eq!(body["data"]["streaks"]["current"], 1);
    assert_eq!(body["data"]["streaks"]["best"], 1);
    assert_eq!(body["data"]["activeCount"], 3);
    assert_eq!(body["data"]["session"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_missing_vocabulary_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.words_path = dir.path().join("absent.json");

    let app = flashdeck_backend::create_app(&config).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({"kind": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EMPTY_DECK");
    assert_eq!(body["error"], "No cards in this deck.");
}
