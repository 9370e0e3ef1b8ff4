//! Typed facades over [`ApiClient`], one per remote resource.
//!
//! Each facade borrows the client and maps a logical operation onto a single
//! request with a fixed endpoint, method and payload. Failures from the
//! executor are returned unchanged.

mod analytics;
mod api_keys;
mod auth;
mod locations;
mod organizations;
mod posts;
mod settings;
mod users;

pub use analytics::Analytics;
pub use api_keys::{ApiKeys, GeneratedKey};
pub use auth::{Auth, LogoutOutcome};
pub use locations::Locations;
pub use organizations::Organizations;
pub use posts::Posts;
pub use settings::Settings;
pub use users::Users;

use super::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts::new(self)
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    pub fn locations(&self) -> Locations<'_> {
        Locations::new(self)
    }

    pub fn api_keys(&self) -> ApiKeys<'_> {
        ApiKeys::new(self)
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(self)
    }
}

/// Encode a caller-supplied value for use as one URL path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
