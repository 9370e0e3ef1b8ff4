//! Dashboard analytics and the older per-area stats endpoints.

use serde::{Deserialize, Serialize};

use super::post::Post;

/// Number of posts shown when the dashboard has no popularity data
const FALLBACK_POPULAR_COUNT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub active: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub new: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularPost {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub views: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostStats {
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub published: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub drafts: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub popular: Vec<PopularPost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationStats {
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub active: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub inactive: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointCount {
    #[serde(deserialize_with = "super::null_as_default")]
    pub endpoint: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestStats {
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub by_endpoint: Vec<EndpointCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityItem {
    #[serde(rename = "type", deserialize_with = "super::null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub user: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub action: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardAnalytics {
    #[serde(deserialize_with = "super::null_as_default")]
    pub user_stats: UserStats,
    #[serde(deserialize_with = "super::null_as_default")]
    pub post_stats: PostStats,
    #[serde(deserialize_with = "super::null_as_default")]
    pub location_stats: LocationStats,
    #[serde(deserialize_with = "super::null_as_default")]
    pub request_stats: RequestStats,
    #[serde(deserialize_with = "super::null_as_default")]
    pub recent_activity: Vec<ActivityItem>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub last_updated: String,
}

/// Response of the older `/admin/stats/dashboard` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_users: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_posts: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_locations: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub api_requests: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub user_change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub post_change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub request_change: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub recent_activity: Vec<ActivityItem>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub popular_posts: Vec<PopularPost>,
}

/// A post paired with its view count for the "popular posts" panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPost {
    pub post: Post,
    pub views: i64,
}

impl DashboardAnalytics {
    /// Join the dashboard's popular list with full post records.
    ///
    /// When the dashboard reports no popular posts, the most viewed posts
    /// are used instead. Popular entries with no matching post keep the id
    /// and title the dashboard gave.
    pub fn popular_posts(&self, posts: &[Post]) -> Vec<RankedPost> {
        if !self.post_stats.popular.is_empty() {
            return self
                .post_stats
                .popular
                .iter()
                .map(|popular| {
                    let post = posts
                        .iter()
                        .find(|p| p.id == popular.id)
                        .cloned()
                        .unwrap_or_else(|| Post {
                            id: popular.id.clone(),
                            title: popular.title.clone(),
                            ..Post::default()
                        });
                    RankedPost {
                        post,
                        views: popular.views,
                    }
                })
                .collect();
        }

        let mut ranked: Vec<RankedPost> = posts
            .iter()
            .map(|p| RankedPost {
                post: p.clone(),
                views: p.view_count.unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|a, b| b.views.cmp(&a.views));
        ranked.truncate(FALLBACK_POPULAR_COUNT);
        ranked
    }
}
