use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::{Health, StorageEntry};
use models::state::PersistedState;
use service::{seeder, storage::KeyValueStore};

use crate::charset;
use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn list_storage(State(state): State<AppState>) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let entries = state.store.entries().await?;
    Ok(Json(entries.into_iter().collect()))
}

async fn get_storage_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StorageEntry>, ApiError> {
    match state.store.get(&key).await? {
        Some(value) => Ok(Json(StorageEntry { key, value })),
        None => Err(ApiError::not_found(format!("key '{key}' not found"))),
    }
}

async fn get_banks(State(state): State<AppState>) -> Result<Json<PersistedState>, ApiError> {
    seeder::load_state(state.store.as_ref())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("question banks have not been seeded"))
}

async fn run_seed(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    seeder::seed(state.store.as_ref()).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// Build the application router: storage API, health, and static files from `frontend_dir`.
pub fn build_router(state: AppState, frontend_dir: &str, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new(frontend_dir);

    let api = Router::new()
        .route("/api/storage", get(list_storage))
        .route("/api/storage/:key", get(get_storage_item))
        .route("/api/banks", get(get_banks))
        .route("/api/seed", post(run_seed));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(middleware::map_response(charset::utf8_charset))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
