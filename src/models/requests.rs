//! Request DTOs for the store API
//!
//! Defines the structure of incoming HTTP request bodies and key validation.

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the PUT operation (PUT /kv/:key)
///
/// # Fields
/// - `value`: Any JSON document to store as the newest version
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The document to store
    pub value: Value,
}

/// Validates a key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_request_deserialize() {
        let json = r#"{"value": {"n": "Jo"}}"#;
        let req: PutRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, json!({"n": "Jo"}));
    }

    #[test]
    fn test_put_request_null_value() {
        let req: PutRequest = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert!(req.value.is_null());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("").is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH)).is_none());
        assert!(validate_key("u1").is_none());
    }
}
