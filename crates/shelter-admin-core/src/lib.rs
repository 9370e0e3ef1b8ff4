//! Core library for the shelter-admin console.
//!
//! This crate holds everything the console needs to talk to the Charity
//! Shelter backend:
//!
//! - `session`: the Session Store and its durable storage backends
//! - `api`: the `ApiClient` request executor, the error taxonomy and the
//!   typed resource facades (auth, users, posts, organizations, ...)
//! - `guard`: the `AuthGuard` that gates protected views on token verification
//! - `poller`: the periodic dashboard refresh task
//! - `config`: on-disk configuration with environment overrides
//! - `models`: wire types exchanged with the remote service

pub mod api;
pub mod config;
pub mod guard;
pub mod models;
pub mod poller;
pub mod session;

pub use api::{ApiClient, ApiError, ApiResult, NormalizedError};
pub use config::Config;
pub use guard::{AuthGuard, GuardDecision, GuardState, Redirect, TokenVerifier, LOGIN_PATH};
pub use poller::{DashboardPoller, DEFAULT_REFRESH_PERIOD, MIN_REFRESH_PERIOD};
pub use session::{DurableStore, Session, SessionStore, SessionUser, StorageBackend};
