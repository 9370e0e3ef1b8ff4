use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Post type. Values this client does not know are kept verbatim so an
/// update sends them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostKind {
    Article,
    News,
    Announcement,
    Other(String),
}

impl From<String> for PostKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "article" => PostKind::Article,
            "news" => PostKind::News,
            "announcement" => PostKind::Announcement,
            _ => PostKind::Other(value),
        }
    }
}

impl From<PostKind> for String {
    fn from(kind: PostKind) -> Self {
        match kind {
            PostKind::Article => "article".to_string(),
            PostKind::News => "news".to_string(),
            PostKind::Announcement => "announcement".to_string(),
            PostKind::Other(value) => value,
        }
    }
}

/// Publication state, with unknown states kept verbatim like `PostKind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
    Other(String),
}

impl From<String> for PostStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => PostStatus::Draft,
            "published" => PostStatus::Published,
            "archived" => PostStatus::Archived,
            _ => PostStatus::Other(value),
        }
    }
}

impl From<PostStatus> for String {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => "draft".to_string(),
            PostStatus::Published => "published".to_string(),
            PostStatus::Archived => "archived".to_string(),
            PostStatus::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub content: String,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PostKind>,
    pub image_url: Option<String>,
    pub additional_images: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_published: bool,
    /// Comma-separated tag list, as the backend stores it.
    pub tags: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<PostStatus>,
    pub view_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: String,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

/// Body of the publish toggle.
#[derive(Debug, Serialize)]
pub(crate) struct PublishToggle {
    #[serde(rename = "isPublished")]
    pub is_published: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_parses_kind_and_status() {
        let post: Post = serde_json::from_value(json!({
            "id": "p1",
            "title": "Winter coat drive",
            "content": "...",
            "type": "announcement",
            "status": "draft",
            "isPublished": false,
            "tags": "winter, donations"
        }))
        .expect("parses");

        assert_eq!(post.kind, Some(PostKind::Announcement));
        assert_eq!(post.status, Some(PostStatus::Draft));
        assert_eq!(post.tags.as_deref(), Some("winter, donations"));
    }

    #[test]
    fn test_unknown_kind_and_status_round_trip() {
        let raw = json!({
            "id": "p2",
            "title": "Gala night",
            "content": "...",
            "type": "event",
            "status": "scheduled",
            "isPublished": false
        });
        let post: Post = serde_json::from_value(raw).expect("parses");
        assert_eq!(post.kind, Some(PostKind::Other("event".to_string())));
        assert_eq!(post.status, Some(PostStatus::Other("scheduled".to_string())));

        let back = serde_json::to_value(&post).expect("serializes");
        assert_eq!(back["type"], json!("event"));
        assert_eq!(back["status"], json!("scheduled"));

        let update = UpdatePostRequest {
            status: post.status.clone(),
            ..UpdatePostRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&update).expect("serializes"),
            json!({"status": "scheduled"})
        );
    }

    #[test]
    fn test_post_with_null_columns_parses() {
        let post: Post = serde_json::from_value(json!({
            "id": "p3",
            "title": "Volunteer call",
            "content": null,
            "type": null,
            "isPublished": null,
            "viewCount": null
        }))
        .expect("parses");

        assert_eq!(post.content, "");
        assert_eq!(post.kind, None);
        assert!(!post.is_published);
        assert_eq!(post.view_count, None);
    }

    #[test]
    fn test_create_post_keeps_boolean_publish_flag() {
        let request = CreatePostRequest {
            title: "Hello".to_string(),
            content: "World".to_string(),
            tags: String::new(),
            is_published: false,
            ..CreatePostRequest::default()
        };
        let value = serde_json::to_value(&request).expect("serializes");
        assert_eq!(value["isPublished"], json!(false));
        assert!(value.get("type").is_none());
    }
}
