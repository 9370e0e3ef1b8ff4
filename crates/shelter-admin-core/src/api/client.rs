//! API client for the Charity Shelter admin REST API.
//!
//! `ApiClient` is the single choke point for every remote call. It applies
//! the standard headers, sends the request, and turns every outcome into
//! either a [`Reply`] or an [`ApiError`]. Resource facades (`users()`,
//! `posts()`, ...) are thin wrappers over [`ApiClient::fetch`] and
//! [`ApiClient::send`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::session::SessionStore;

use super::error::{ApiError, ApiResult};
use super::request::{Payload, Request};

// ============================================================================
// Constants
// ============================================================================

/// Header identifying this console to the backend
const API_KEY_HEADER: &str = "x-api-key";

/// Outcome of a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 204 No Content; the body was not read.
    Empty,
    /// Any other 2xx with its JSON body, unvalidated.
    Json { status: u16, value: Value },
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Empty => StatusCode::NO_CONTENT.as_u16(),
            Reply::Json { status, .. } => *status,
        }
    }

    /// The JSON body, or `null` for an empty reply.
    pub fn into_value(self) -> Value {
        match self {
            Reply::Empty => Value::Null,
            Reply::Json { value, .. } => value,
        }
    }
}

/// Request executor for the admin API.
/// Clone is cheap - reqwest::Client and the session store are both shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client for the configured service, reading tokens from `session`.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            session,
        })
    }

    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and classify its outcome. Never retries.
    pub async fn execute(&self, request: Request) -> ApiResult<Reply> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        let headers = self.headers(&request)?;
        let method = request.method.clone();

        debug!(method = %method, url = %url, auth = request.require_auth, "API request");

        let builder = self.client.request(method.clone(), &url).headers(headers);
        let builder = match request.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.body(value.to_string()),
            Payload::Multipart(upload) => builder.multipart(upload.into_form()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(&method, &url, e))?;

        let status = response.status();
        debug!(method = %method, url = %url, status = status.as_u16(), "API response");

        if status == StatusCode::NO_CONTENT {
            return Ok(Reply::Empty);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(&method, &url, e))?;

        if !status.is_success() {
            let error = ApiError::from_status(status, &body);
            warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                body = %ApiError::truncate_body(&body),
                "API request rejected"
            );
            return Err(error);
        }

        serde_json::from_slice::<Value>(&body)
            .map(|value| Reply::Json {
                status: status.as_u16(),
                value,
            })
            .map_err(|e| {
                warn!(url = %url, error = %e, "Response body is not JSON");
                ApiError::response_shape(
                    status.as_u16(),
                    format!("Failed to parse JSON response from {}: {}", request.endpoint, e),
                )
            })
    }

    /// Execute and decode the body into `T`.
    ///
    /// An empty reply decodes from `null` first, so `Option` and `()` come
    /// back as nothing. Targets that reject `null` get their empty value
    /// instead: an empty list for sequences, or the record defaults.
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> ApiResult<T> {
        let endpoint = request.endpoint.clone();
        let reply = self.execute(request).await?;
        let status = reply.status();

        let decoded = match reply {
            Reply::Empty => decode_empty(),
            Reply::Json { value, .. } => serde_json::from_value(value),
        };
        decoded.map_err(|e| {
            ApiError::response_shape(
                status,
                format!("Unexpected response shape from {}: {}", endpoint, e),
            )
        })
    }

    /// Execute and discard whatever body came back.
    pub async fn send(&self, request: Request) -> ApiResult<()> {
        self.execute(request).await.map(|_| ())
    }

    fn headers(&self, request: &Request) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| ApiError::internal(format!("Invalid API key header: {}", e)))?;
        headers.insert(API_KEY_HEADER, api_key);

        if !request.is_form_encoded() {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        // A missing token is not an error here; the server answers 401.
        if request.require_auth {
            if let Some(token) = self.session.token() {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::internal(format!("Invalid auth token header: {}", e)))?;
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    fn transport_error(method: &Method, url: &str, error: reqwest::Error) -> ApiError {
        if error.is_builder() {
            warn!(method = %method, url = %url, error = %error, "Failed to build request");
            return ApiError::internal(format!("Failed to build request to {}: {}", url, error));
        }
        warn!(method = %method, url = %url, error = %error, "API unreachable");
        ApiError::network(error.to_string())
    }
}

/// Decode a 204 into the first empty JSON value `T` accepts.
fn decode_empty<T: DeserializeOwned>() -> serde_json::Result<T> {
    serde_json::from_value(Value::Null)
        .or_else(|_| serde_json::from_value(Value::Array(Vec::new())))
        .or_else(|_| serde_json::from_value(Value::Object(serde_json::Map::new())))
}
