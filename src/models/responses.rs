//! Response DTOs for the store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for GET /kv/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The current value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /kv/:key
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
    /// Index of the version just recorded
    pub version: usize,
}

impl PutResponse {
    pub fn new(key: impl Into<String>, version: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored as version {}", key, version),
            key,
            version,
        }
    }
}

/// Response body for GET /kv/:key/versions/:index
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub key: String,
    pub index: usize,
    pub value: Value,
}

impl VersionResponse {
    pub fn new(key: impl Into<String>, index: usize, value: Value) -> Self {
        Self {
            key: key.into(),
            index,
            value,
        }
    }
}

/// Response body for GET /kv/:key/versions
#[derive(Debug, Clone, Serialize)]
pub struct VersionCountResponse {
    pub key: String,
    /// Number of recorded versions (0 for unknown keys)
    pub count: usize,
}

/// Generic success message (DELETE /kv, POST /snapshot)
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in the cache
    pub cached_entries: usize,
    /// Configured cache capacity
    pub capacity: usize,
    /// Number of keys in the store
    pub stored_keys: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and the store size
    pub fn new(stats: &CacheStats, stored_keys: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            cached_entries: stats.entries,
            capacity: stats.capacity,
            stored_keys,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("u1", json!({"n": "Jo"}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"key": "u1", "value": {"n": "Jo"}}));
    }

    #[test]
    fn test_put_response_serialize() {
        let resp = PutResponse::new("my_key", 2);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("\"version\":2"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            evictions: 5,
            entries: 10,
            capacity: 10,
        };
        let resp = StatsResponse::new(&stats, 40);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.stored_keys, 40);
        assert_eq!(resp.cached_entries, 10);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(&CacheStats::new(4), 0);
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
