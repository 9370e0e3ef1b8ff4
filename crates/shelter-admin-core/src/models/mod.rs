//! Data models for the Charity Shelter admin API.
//!
//! These records are pass-through types: their fields are dictated by the
//! remote service and the client does not validate them. Unknown fields on
//! the main records are kept in an `extra` map so updates round-trip them.
//!
//! - `User`, `CreateUserRequest`, `UpdateUserRequest`
//! - `Post` and its request types
//! - `OrganizationData`, `Branch` and the branch/organization forms
//! - `ApiKey`, `GenerateApiKeyRequest`, `ApiKeyResponse`
//! - Dashboard analytics and the legacy stats types
//! - `UserSettings` and profile picture upload results

pub mod analytics;
pub mod api_key;
pub mod auth;
pub mod organization;
pub mod post;
pub mod settings;
pub mod user;

pub use analytics::{
    ActivityItem, DashboardAnalytics, DashboardStats, EndpointCount, LocationStats, PopularPost,
    PostStats, RankedPost, RequestStats, UserStats,
};
pub use api_key::{ApiKey, ApiKeyResponse, GenerateApiKeyRequest};
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
pub use organization::{
    Branch, BranchForm, ContactInfo, CreateBranchRequest, OrganizationData, OrganizationForm,
    SocialMedia, UpdateBranchRequest,
};
pub use post::{CreatePostRequest, Post, PostKind, PostStatus, UpdatePostRequest};
pub use settings::{NotificationPreferences, ProfilePictureResponse, SettingsUpdate, UserSettings};
pub use user::{CreateUserRequest, UpdateUserRequest, User};

// Helper to deserialize an explicit null the same way as a missing field.
// The backend sends null for unset columns, which `#[serde(default)]` alone
// rejects for non-Option fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;

    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
