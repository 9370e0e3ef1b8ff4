//! Request descriptors handed to [`ApiClient::execute`](super::ApiClient::execute).

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::{ApiError, ApiResult};

/// Body of a request.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Multipart(FileUpload),
}

/// A single file sent as a multipart form field.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk into an upload under the given form field.
    pub fn from_path(field: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(field, file_name, bytes))
    }

    pub(crate) fn into_form(self) -> Form {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        Form::new().part(self.field, part)
    }
}

/// One call to the remote service: endpoint, method, payload and whether the
/// bearer token should be attached.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) endpoint: String,
    pub(crate) method: Method,
    pub(crate) payload: Payload,
    pub(crate) require_auth: bool,
}

impl Request {
    /// Requests are authenticated unless [`Request::public`] is called.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            payload: Payload::Empty,
            require_auth: true,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::internal(format!("Failed to serialize request body for {}: {}", self.endpoint, e))
        })?;
        self.payload = Payload::Json(value);
        Ok(self)
    }

    /// Attach a multipart file upload.
    pub fn multipart(mut self, upload: FileUpload) -> Self {
        self.payload = Payload::Multipart(upload);
        self
    }

    /// Do not attach the bearer token.
    pub fn public(mut self) -> Self {
        self.require_auth = false;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn requires_auth(&self) -> bool {
        self.require_auth
    }

    /// Multipart bodies let the transport choose their own content type.
    pub fn is_form_encoded(&self) -> bool {
        matches!(self.payload, Payload::Multipart(_))
    }
}
