//! Gate for protected views.
//!
//! A guard is mounted once per protected view. It starts out `Checking`,
//! verifies the stored token exactly once, and settles in either
//! `Authenticated` or `Redirecting`. The guard never navigates itself: it
//! hands back a [`GuardDecision`] and the host acts on it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::ApiResult;
use crate::session::SessionStore;

/// Route of the login view
pub const LOGIN_PATH: &str = "/login";

/// Anything that can tell whether the current token is still accepted.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify_token(&self) -> ApiResult<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated,
    Redirecting,
}

impl GuardState {
    /// Protected content must not be shown in this state.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, GuardState::Authenticated)
    }
}

/// Navigation the host should perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to_login() -> Self {
        Self {
            location: LOGIN_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Redirect),
}

pub struct AuthGuard {
    session: Arc<SessionStore>,
    state: GuardState,
    decision: Option<GuardDecision>,
}

impl AuthGuard {
    pub fn mount(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            state: GuardState::Checking,
            decision: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Verify the session and decide. Later calls on the same mount return
    /// the first decision without verifying again.
    pub async fn check<V>(&mut self, verifier: &V) -> GuardDecision
    where
        V: TokenVerifier + ?Sized,
    {
        if let Some(decision) = &self.decision {
            return decision.clone();
        }

        self.session.init_auth();

        let decision = match verifier.verify_token().await {
            Ok(true) => {
                debug!("Session verified");
                self.state = GuardState::Authenticated;
                GuardDecision::Proceed
            }
            Ok(false) => {
                info!("No valid session, redirecting to login");
                self.reject()
            }
            Err(e) => {
                warn!(status = e.status(), error = %e, "Session verification failed, redirecting to login");
                self.reject()
            }
        };

        self.decision = Some(decision.clone());
        decision
    }

    fn reject(&mut self) -> GuardDecision {
        self.session.clear();
        self.state = GuardState::Redirecting;
        GuardDecision::Redirect(Redirect::to_login())
    }
}
