use tracing::debug;

use crate::api::error::ApiResult;
use crate::api::request::{FileUpload, Request};
use crate::api::ApiClient;
use crate::models::{ProfilePictureResponse, SettingsUpdate, UserSettings};

const SETTINGS: &str = "/api/v1/admin/settings";
const PROFILE_PICTURE: &str = "/api/v1/admin/settings/profile-picture";

/// Settings of the signed-in user.
pub struct Settings<'a> {
    client: &'a ApiClient,
}

impl<'a> Settings<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<UserSettings> {
        self.client.fetch(Request::get(SETTINGS)).await
    }

    pub async fn update(&self, update: &SettingsUpdate) -> ApiResult<UserSettings> {
        self.client
            .fetch(Request::put(SETTINGS).json(update)?)
            .await
    }

    /// Upload a new profile picture as multipart form data.
    pub async fn upload_profile_picture(
        &self,
        upload: FileUpload,
    ) -> ApiResult<ProfilePictureResponse> {
        debug!(file_name = %upload.file_name, size = upload.bytes.len(), "Uploading profile picture");
        self.client
            .fetch(Request::post(PROFILE_PICTURE).multipart(upload))
            .await
    }
}
