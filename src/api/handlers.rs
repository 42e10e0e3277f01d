//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto a store operation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{ApiError, ApiResult, Result};
use crate::models::{
    validate_key, GetResponse, HealthResponse, MessageResponse, PutRequest, PutResponse,
    StatsResponse, VersionCountResponse, VersionResponse,
};
use crate::store::{StoreObserver, VersionedStore};

/// Application state shared across all handlers.
///
/// The store synchronizes internally, so it is shared behind a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<VersionedStore>,
}

impl AppState {
    /// Creates a new AppState around an opened store.
    pub fn new(store: VersionedStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Opens the store described by `config`.
    ///
    /// Loads the snapshot and starts the writer, so it must run inside a
    /// Tokio runtime when persistence is enabled.
    pub fn from_config(config: &Config, observer: Arc<dyn StoreObserver>) -> Result<Self> {
        let store = VersionedStore::open(config.store_config(), observer)?;
        Ok(Self::new(store))
    }
}

fn check_key(key: &str) -> ApiResult<()> {
    match validate_key(key) {
        Some(msg) => Err(ApiError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /kv/:key
///
/// Stores the body's value as the newest version of the key.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutRequest>,
) -> ApiResult<Json<PutResponse>> {
    check_key(&key)?;
    let version = state.store.put(key.clone(), req.value);
    Ok(Json(PutResponse::new(key, version)))
}

/// Handler for GET /kv/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<GetResponse>> {
    check_key(&key)?;
    let value = state
        .store
        .try_get(&key)
        .ok_or_else(|| ApiError::NotFound(format!("key '{}'", key)))?;
    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /kv/:key/versions/:index
pub async fn get_version_handler(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
) -> ApiResult<Json<VersionResponse>> {
    check_key(&key)?;
    let value = state
        .store
        .get_version(&key, index)
        .ok_or_else(|| ApiError::NotFound(format!("version {} of key '{}'", index, key)))?;
    Ok(Json(VersionResponse::new(key, index, value)))
}

/// Handler for GET /kv/:key/versions
pub async fn version_count_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<VersionCountResponse>> {
    check_key(&key)?;
    let count = state.store.version_count(&key);
    Ok(Json(VersionCountResponse { key, count }))
}

/// Handler for DELETE /kv
///
/// Drops every key and version chain.
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.store.clear();
    Json(MessageResponse::new("Store cleared"))
}

/// Handler for POST /snapshot
///
/// Waits for the latest state to reach the snapshot file.
pub async fn snapshot_handler(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.store.flush().await?;
    let message = match state.store.snapshot_path() {
        Some(path) => format!("Snapshot written to {}", path.display()),
        None => "Persistence disabled, nothing to write".to_string(),
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store.cache_stats();
    Json(StatsResponse::new(&stats, state.store.len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(VersionedStore::in_memory(100).unwrap())
    }

    #[tokio::test]
    async fn test_put_and_get_handler() {
        let state = test_state();

        let req = PutRequest {
            value: json!({"n": "Jo"}),
        };
        let result = put_handler(State(state.clone()), Path("u1".to_string()), Json(req)).await;
        assert_eq!(result.unwrap().version, 0);

        let result = get_handler(State(state.clone()), Path("u1".to_string())).await;
        assert_eq!(result.unwrap().value, json!({"n": "Jo"}));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_version_handlers() {
        let state = test_state();
        state.store.put("k", json!(1));
        state.store.put("k", json!(2));

        let result =
            get_version_handler(State(state.clone()), Path(("k".to_string(), 0))).await;
        assert_eq!(result.unwrap().value, json!(1));

        let result =
            get_version_handler(State(state.clone()), Path(("k".to_string(), 2))).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = version_count_handler(State(state), Path("k".to_string())).await;
        assert_eq!(result.unwrap().count, 2);
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state();
        state.store.put("k", json!(1));

        clear_handler(State(state.clone())).await;

        let result = get_handler(State(state), Path("k".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_snapshot_handler_memory_only() {
        let result = snapshot_handler(State(test_state())).await;
        assert!(result.unwrap().message.contains("disabled"));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        state.store.put("k", json!(1));
        state.store.get("k", json!(null));

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 1);
        assert_eq!(response.misses, 0);
        assert_eq!(response.stored_keys, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_put_invalid_key() {
        let state = test_state();

        let req = PutRequest { value: json!(1) };
        let result = put_handler(State(state), Path("x".repeat(300)), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
