use crate::api::error::ApiResult;
use crate::api::request::Request;
use crate::api::ApiClient;
use crate::models::{
    ActivityItem, DashboardAnalytics, DashboardStats, LocationStats, PostStats, RequestStats,
    UserStats,
};

const DASHBOARD: &str = "/api/v1/admin/dashboard";
const ANALYTICS: &str = "/api/v1/admin/analytics";
const STATS_DASHBOARD: &str = "/api/v1/admin/stats/dashboard";

pub struct Analytics<'a> {
    client: &'a ApiClient,
}

impl<'a> Analytics<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Everything the dashboard shows, in one call.
    pub async fn dashboard(&self) -> ApiResult<DashboardAnalytics> {
        self.client.fetch(Request::get(DASHBOARD)).await
    }

    // Per-area endpoints kept for older backends

    pub async fn user_stats(&self) -> ApiResult<UserStats> {
        self.client.fetch(Request::get(Self::area("users"))).await
    }

    pub async fn post_stats(&self) -> ApiResult<PostStats> {
        self.client.fetch(Request::get(Self::area("posts"))).await
    }

    pub async fn location_stats(&self) -> ApiResult<LocationStats> {
        self.client
            .fetch(Request::get(Self::area("locations")))
            .await
    }

    pub async fn request_stats(&self) -> ApiResult<RequestStats> {
        self.client
            .fetch(Request::get(Self::area("requests")))
            .await
    }

    pub async fn recent_activity(&self) -> ApiResult<Vec<ActivityItem>> {
        self.client
            .fetch(Request::get(Self::area("activities")))
            .await
    }

    pub async fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        self.client.fetch(Request::get(STATS_DASHBOARD)).await
    }

    fn area(name: &str) -> String {
        format!("{}/{}", ANALYTICS, name)
    }
}
