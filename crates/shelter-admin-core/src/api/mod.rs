//! REST API client module for the Charity Shelter backend.
//!
//! This module provides the `ApiClient` request executor, the `ApiError`
//! failure taxonomy, and one typed facade per remote resource.
//!
//! Every request carries the console's `X-API-Key` header; protected
//! endpoints also carry the bearer token held by the `SessionStore`.

pub mod client;
pub mod error;
pub mod request;
pub mod resources;

pub use client::{ApiClient, Reply};
pub use error::{ApiError, ApiResult, NormalizedError, INVALID_RESPONSE_FORMAT, NETWORK_ERROR_MESSAGE};
pub use request::{FileUpload, Payload, Request};
pub use resources::{
    Analytics, ApiKeys, Auth, GeneratedKey, Locations, LogoutOutcome, Organizations, Posts,
    Settings, Users,
};
