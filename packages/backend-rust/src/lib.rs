pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod vocabulary;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::SnapshotStore;
use crate::services::ProgressService;
use crate::state::AppState;
use crate::vocabulary::Vocabulary;

/// Loads vocabulary and saved progress, then builds the HTTP app.
///
/// An unusable database keeps the server running without persistence.
pub async fn create_app(config: &Config) -> axum::Router {
    let vocabulary = Vocabulary::load(&config.words_path, &config.sentences_path).await;

    let store = match db::init_sqlite_pool(&config.database_path).await {
        Ok(pool) => {
            tracing::info!(path = %config.database_path.display(), "progress store ready");
            Some(SnapshotStore::new(pool))
        }
        Err(err) => {
            tracing::warn!(error = %err, "progress store unavailable, progress will not be saved");
            None
        }
    };

    let progress = ProgressService::bootstrap(vocabulary, config.engine.clone(), store).await;
    build_app(AppState::new(progress))
}

pub fn build_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
