use tracing::debug;

use crate::api::error::ApiResult;
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::post::PublishToggle;
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};

use super::segment;

const POSTS: &str = "/api/v1/admin/posts";

pub struct Posts<'a> {
    client: &'a ApiClient,
}

impl<'a> Posts<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Post>> {
        self.client.fetch(Request::get(POSTS)).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Post> {
        self.client.fetch(Request::get(Self::item(id))).await
    }

    pub async fn create(&self, post: &CreatePostRequest) -> ApiResult<Post> {
        debug!(title = %post.title, is_published = post.is_published, "Creating post");
        self.client.fetch(Request::post(POSTS).json(post)?).await
    }

    pub async fn update(&self, id: &str, post: &UpdatePostRequest) -> ApiResult<Post> {
        debug!(post_id = id, is_published = ?post.is_published, "Updating post");
        self.client
            .fetch(Request::put(Self::item(id)).json(post)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.send(Request::delete(Self::item(id))).await
    }

    /// Full-text search; the term travels as a path segment.
    pub async fn search(&self, term: &str) -> ApiResult<Vec<Post>> {
        let endpoint = format!("{}/search/{}", POSTS, segment(term));
        self.client.fetch(Request::get(endpoint)).await
    }

    pub async fn set_published(&self, id: &str, is_published: bool) -> ApiResult<Post> {
        let endpoint = format!("{}/publish", Self::item(id));
        self.client
            .fetch(Request::patch(endpoint).json(&PublishToggle { is_published })?)
            .await
    }

    fn item(id: &str) -> String {
        format!("{}/{}", POSTS, segment(id))
    }
}
