use serde::{Deserialize, Serialize};

/// A service API key issued by the backend.
///
/// Only the secret is required; the backend leaves the other columns null
/// until they are filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: String,
    pub key: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_by: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub last_used: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl ApiKey {
    /// The secret with everything but its first and last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateApiKeyRequest {
    pub user_id: String,
    pub description: String,
    /// `"never"` or a day count such as `"30d"`.
    pub expiration: String,
    pub permissions: Vec<String>,
}

/// Canonical result of key generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub key: ApiKey,
}
