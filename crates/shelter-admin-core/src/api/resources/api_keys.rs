use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult, INVALID_RESPONSE_FORMAT};
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::{ApiKey, ApiKeyResponse, GenerateApiKeyRequest};

use super::segment;

const API_KEYS: &str = "/api/v1/admin/api-keys";

/// The shapes the backend has been seen to answer key generation with.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedKey {
    /// `{"key": {"key": "...", ...}}`
    Wrapped(ApiKey),
    /// `{"key": "..."}`
    WrappedSecret(String),
    /// `"..."`
    RawSecret(String),
    /// `{"id": "...", "key": "...", ...}`
    Bare(ApiKey),
}

impl GeneratedKey {
    /// Classify a generation response. Shapes are tried in declaration
    /// order; the first match wins. The shape is decided from the JSON
    /// alone, so a matched record is never rejected for its other columns.
    pub fn parse(value: &Value) -> Option<Self> {
        let key = value.get("key");

        if let Some(record) = key.filter(|k| k.is_object()) {
            if record.get("key").is_some_and(truthy) {
                return Some(GeneratedKey::Wrapped(record_from(record)));
            }
        }

        if let Some(Value::String(secret)) = key {
            if !secret.is_empty() {
                return Some(GeneratedKey::WrappedSecret(secret.clone()));
            }
        }

        if let Value::String(secret) = value {
            if !secret.is_empty() {
                return Some(GeneratedKey::RawSecret(secret.clone()));
            }
        }

        if value.get("id").is_some_and(truthy) && key.is_some_and(truthy) {
            return Some(GeneratedKey::Bare(record_from(value)));
        }

        None
    }

    /// Normalize to the canonical response. Bare secrets get a locally
    /// generated record filled in from the request.
    pub fn into_response(self, request: &GenerateApiKeyRequest) -> ApiKeyResponse {
        let key = match self {
            GeneratedKey::Wrapped(key) | GeneratedKey::Bare(key) => key,
            GeneratedKey::WrappedSecret(secret) | GeneratedKey::RawSecret(secret) => ApiKey {
                id: Uuid::new_v4().to_string(),
                key: secret,
                description: request.description.clone(),
                created_by: request.user_id.clone(),
                created_at: chrono::Utc::now().to_rfc3339(),
                last_used: None,
                active: true,
                permissions: request.permissions.clone(),
                expires_at: None,
            },
        };
        ApiKeyResponse { key }
    }
}

/// Decode a matched key record. Columns with unexpected types are dropped
/// instead of failing the whole response.
fn record_from(record: &Value) -> ApiKey {
    serde_json::from_value(record.clone()).unwrap_or_else(|e| {
        debug!(error = %e, "API key record has unexpected column types");

        let text = |name: &str| match record.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let optional = |name: &str| Some(text(name)).filter(|s| !s.is_empty());

        ApiKey {
            id: text("id"),
            key: text("key"),
            description: text("description"),
            created_by: text("createdBy"),
            created_at: text("createdAt"),
            last_used: optional("lastUsed"),
            active: record.get("active").is_some_and(truthy),
            permissions: record
                .get("permissions")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            expires_at: optional("expiresAt"),
        }
    })
}

/// Loose presence test: null, false, zero and empty strings are absent.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub struct ApiKeys<'a> {
    client: &'a ApiClient,
}

impl<'a> ApiKeys<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<ApiKey>> {
        self.client.fetch(Request::get(API_KEYS)).await
    }

    /// Issue a new key. Whatever shape the backend answers with, the result
    /// is a full [`ApiKeyResponse`].
    pub async fn generate(&self, request: &GenerateApiKeyRequest) -> ApiResult<ApiKeyResponse> {
        debug!(
            user_id = %request.user_id,
            expiration = %request.expiration,
            permissions = request.permissions.len(),
            "Generating API key"
        );

        let reply = self
            .client
            .execute(Request::post(API_KEYS).json(request)?)
            .await?;
        let status = reply.status();
        let body = reply.into_value();

        match GeneratedKey::parse(&body) {
            Some(generated) => Ok(generated.into_response(request)),
            None => {
                warn!(status, "Unrecognized API key generation response");
                Err(ApiError::response_shape(status, INVALID_RESPONSE_FORMAT))
            }
        }
    }

    /// Revoke a key by its secret value.
    pub async fn revoke(&self, key: &str) -> ApiResult<()> {
        let endpoint = format!("{}/{}", API_KEYS, segment(key));
        self.client.send(Request::delete(endpoint)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> GenerateApiKeyRequest {
        GenerateApiKeyRequest {
            user_id: "u-7".to_string(),
            description: "Donation kiosk".to_string(),
            expiration: "30d".to_string(),
            permissions: vec!["read".to_string(), "write".to_string()],
        }
    }

    #[test]
    fn test_parse_wrapped_record() {
        let body = json!({"key": {"id": "k1", "key": "sk_full", "active": false}});
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Wrapped(key)) => {
                assert_eq!(key.id, "k1");
                assert_eq!(key.key, "sk_full");
                assert!(!key.active);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrapped_record_with_null_columns() {
        let body = json!({
            "key": {"id": "k1", "key": "sk_full", "description": null, "createdBy": null, "active": true}
        });
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Wrapped(key)) => {
                assert_eq!(key.key, "sk_full");
                assert_eq!(key.description, "");
                assert_eq!(key.created_by, "");
                assert!(key.active);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrapped_record_with_mistyped_columns() {
        let body = json!({
            "key": {"id": 17, "key": "sk_full", "active": 1, "permissions": ["read", 2]}
        });
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Wrapped(key)) => {
                assert_eq!(key.id, "17");
                assert_eq!(key.key, "sk_full");
                assert!(key.active);
                assert_eq!(key.permissions, vec!["read".to_string()]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrapped_secret() {
        assert_eq!(
            GeneratedKey::parse(&json!({"key": "sk_wrapped"})),
            Some(GeneratedKey::WrappedSecret("sk_wrapped".to_string()))
        );
    }

    #[test]
    fn test_parse_raw_secret() {
        assert_eq!(
            GeneratedKey::parse(&json!("sk_abc")),
            Some(GeneratedKey::RawSecret("sk_abc".to_string()))
        );
    }

    #[test]
    fn test_parse_bare_record() {
        let body = json!({"id": "k9", "key": "sk_bare", "permissions": ["read"]});
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Bare(key)) => {
                assert_eq!(key.id, "k9");
                assert_eq!(key.permissions, vec!["read".to_string()]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_record_with_null_columns() {
        let body = json!({
            "id": "k9",
            "key": "sk_bare",
            "description": null,
            "createdAt": null,
            "active": null,
            "permissions": null,
            "lastUsed": null
        });
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Bare(key)) => {
                assert_eq!(key.id, "k9");
                assert_eq!(key.created_at, "");
                assert!(!key.active);
                assert!(key.permissions.is_empty());
                assert_eq!(key.last_used, None);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_falsy_shapes() {
        assert_eq!(GeneratedKey::parse(&json!({"foo": 1})), None);
        assert_eq!(GeneratedKey::parse(&json!("")), None);
        assert_eq!(GeneratedKey::parse(&json!({"key": ""})), None);
        assert_eq!(GeneratedKey::parse(&json!({"key": {"key": ""}})), None);
        assert_eq!(GeneratedKey::parse(&Value::Null), None);
        assert_eq!(GeneratedKey::parse(&json!(42)), None);
    }

    #[test]
    fn test_wrapped_record_takes_priority_over_bare() {
        let body = json!({"id": "outer", "key": {"id": "inner", "key": "sk_nested"}});
        match GeneratedKey::parse(&body) {
            Some(GeneratedKey::Wrapped(key)) => assert_eq!(key.id, "inner"),
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_secret_is_completed_from_request() {
        let response = GeneratedKey::RawSecret("sk_abc".to_string()).into_response(&request());
        let key = response.key;

        assert_eq!(key.key, "sk_abc");
        assert!(key.active);
        assert_eq!(key.permissions, vec!["read".to_string(), "write".to_string()]);
        assert_eq!(key.description, "Donation kiosk");
        assert_eq!(key.created_by, "u-7");
        assert!(key.last_used.is_none());
        assert!(key.expires_at.is_none());
        assert!(Uuid::parse_str(&key.id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&key.created_at).is_ok());
    }

    #[test]
    fn test_record_passes_through_unchanged() {
        let record = ApiKey {
            id: "k1".to_string(),
            key: "sk_full".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            ..ApiKey::default()
        };
        let response = GeneratedKey::Wrapped(record.clone()).into_response(&request());
        assert_eq!(response.key, record);
    }
}
