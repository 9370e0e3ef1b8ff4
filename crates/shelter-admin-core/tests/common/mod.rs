//! Throwaway HTTP backend for exercising the client end to end.
//!
//! `MockApi` answers every request from a table of canned responses keyed by
//! method and raw path, and records what it received. Unknown routes get a
//! JSON 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpListener;

use shelter_admin_core::session::{DurableStore, MemoryStore};
use shelter_admin_core::{ApiClient, Config, SessionStore, SessionUser};

pub const TEST_API_KEY: &str = "test-console-key";
pub const TEST_TOKEN: &str = "tok-1";

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Hit {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
pub struct MockApi {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.canned(method, path, status, "application/json", body.to_string())
    }

    pub fn text(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.canned(method, path, status, "text/html", body.to_string())
    }

    pub fn no_content(self, method: Method, path: &str) -> Self {
        self.canned(method, path, 204, "application/json", String::new())
    }

    fn canned(
        self,
        method: Method,
        path: &str,
        status: u16,
        content_type: &'static str,
        body: String,
    ) -> Self {
        self.routes.lock().insert(
            (method, path.to_string()),
            Canned {
                status: StatusCode::from_u16(status).expect("valid status"),
                content_type,
                body,
            },
        );
        self
    }

    /// Bind to an ephemeral port and serve in the background.
    pub async fn start(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = Router::new().fallback(respond).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });
        format!("http://{}", addr)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().clone()
    }

    pub fn hit(&self, method: &Method, path: &str) -> Hit {
        self.hits()
            .into_iter()
            .find(|h| &h.method == method && h.path == path)
            .unwrap_or_else(|| panic!("no {} {} was received", method, path))
    }
}

async fn respond(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    api.hits.lock().push(Hit {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let canned = api.routes.lock().get(&(method, path)).cloned();
    match canned {
        Some(c) if c.status == StatusCode::NO_CONTENT => StatusCode::NO_CONTENT.into_response(),
        Some(c) => (c.status, [(header::CONTENT_TYPE, c.content_type)], c.body).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"message":"Route not mocked"}"#,
        )
            .into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn admin_user() -> SessionUser {
    SessionUser {
        id: "u1".to_string(),
        email: "admin@shelter.org".to_string(),
        role: "admin".to_string(),
    }
}

/// Client over a fresh in-memory session. The storage is returned so tests
/// can check what was persisted.
pub fn client_for(base_url: &str) -> (ApiClient, Arc<SessionStore>, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::default());
    let durable: Arc<dyn DurableStore> = storage.clone();
    let session = Arc::new(SessionStore::new(durable));
    let config = Config {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        ..Config::default()
    };
    let client = ApiClient::new(&config, session.clone()).expect("client");
    (client, session, storage)
}

pub fn signed_in_client(base_url: &str) -> (ApiClient, Arc<SessionStore>, Arc<MemoryStore>) {
    let (client, session, storage) = client_for(base_url);
    session.establish(TEST_TOKEN.to_string(), admin_user());
    (client, session, storage)
}
