use crate::api::error::ApiResult;
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

use super::segment;

const USERS: &str = "/api/v1/admin/users";

pub struct Users<'a> {
    client: &'a ApiClient,
}

impl<'a> Users<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        self.client.fetch(Request::get(USERS)).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<User> {
        self.client.fetch(Request::get(Self::item(id))).await
    }

    pub async fn create(&self, user: &CreateUserRequest) -> ApiResult<User> {
        self.client.fetch(Request::post(USERS).json(user)?).await
    }

    pub async fn update(&self, id: &str, user: &UpdateUserRequest) -> ApiResult<User> {
        self.client
            .fetch(Request::put(Self::item(id)).json(user)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.send(Request::delete(Self::item(id))).await
    }

    fn item(id: &str) -> String {
        format!("{}/{}", USERS, segment(id))
    }
}
