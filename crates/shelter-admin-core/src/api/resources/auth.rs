use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::guard::{Redirect, TokenVerifier};
use crate::models::auth::VerifyRequest;
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::session::SessionUser;

const LOGIN: &str = "/api/v1/auth/login";
const LOGOUT: &str = "/api/v1/auth/logout";
const VERIFY: &str = "/api/v1/auth/verify";
const CHANGE_PASSWORD: &str = "/api/v1/auth/change-password";

/// Result of a logout. The local session is gone either way.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoutOutcome {
    /// Where the host should navigate next.
    pub redirect: Redirect,
    /// Set when the server-side invalidation call failed.
    pub remote_error: Option<ApiError>,
}

/// Authentication operations. These are the only calls that write to the
/// Session Store.
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and store the returned token and user before handing them back.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self
            .client
            .fetch(Request::post(LOGIN).public().json(credentials)?)
            .await?;

        self.client
            .session()
            .establish(response.token.clone(), response.user.clone());
        Ok(response)
    }

    /// Invalidate the token remotely, then clear the local session no matter
    /// what the server said.
    pub async fn logout(&self) -> LogoutOutcome {
        let remote = self.client.send(Request::post(LOGOUT)).await;
        self.client.session().clear();

        let remote_error = match remote {
            Ok(()) => {
                info!("Logged out");
                None
            }
            Err(e) => {
                warn!(status = e.status(), error = %e, "Remote logout failed, session cleared locally");
                Some(e)
            }
        };

        LogoutOutcome {
            redirect: Redirect::to_login(),
            remote_error,
        }
    }

    /// Ask the server whether the stored token is still valid.
    ///
    /// Without a token this is `Ok(false)` and nothing is sent. Any failure
    /// clears the session before the error is returned.
    pub async fn verify_token(&self) -> ApiResult<bool> {
        let session = self.client.session();
        let Some(token) = session.token() else {
            return Ok(false);
        };

        let request = Request::post(VERIFY)
            .public()
            .json(&VerifyRequest { token: &token })?;

        match self.client.send(request).await {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(status = e.status(), error = %e, "Token verification failed");
                session.clear();
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<()> {
        self.client
            .send(Request::post(CHANGE_PASSWORD).json(request)?)
            .await
    }

    /// Load the persisted session, once per process.
    pub fn init_auth(&self) {
        self.client.session().init_auth();
    }

    pub fn token(&self) -> Option<String> {
        self.client.session().token()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.client.session().current_user()
    }
}

#[async_trait]
impl TokenVerifier for ApiClient {
    async fn verify_token(&self) -> ApiResult<bool> {
        self.auth().verify_token().await
    }
}
