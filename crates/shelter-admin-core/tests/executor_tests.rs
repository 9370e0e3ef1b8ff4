mod common;

use axum::http::Method;
use serde_json::{json, Value};

use common::{client_for, signed_in_client, unreachable_base_url, MockApi, TEST_API_KEY};
use shelter_admin_core::api::{Reply, Request, NETWORK_ERROR_MESSAGE};
use shelter_admin_core::models::{CreatePostRequest, User};
use shelter_admin_core::ApiError;

const USERS: &str = "/api/v1/admin/users";

#[tokio::test]
async fn test_no_content_is_empty_reply() {
    let api = MockApi::new().no_content(Method::DELETE, "/api/v1/admin/users/u9");
    let (client, _, _) = signed_in_client(&api.start().await);

    let reply = client
        .execute(Request::delete("/api/v1/admin/users/u9"))
        .await
        .expect("204 is a success");
    assert_eq!(reply, Reply::Empty);
    assert_eq!(reply.status(), 204);

    client.users().delete("u9").await.expect("delete");
}

#[tokio::test]
async fn test_success_body_is_returned_verbatim() {
    let body = json!([{"id": "u1", "username": "amy", "email": "amy@shelter.org", "role": "admin", "badge": 3}]);
    let api = MockApi::new().json(Method::GET, USERS, 200, body.clone());
    let (client, _, _) = signed_in_client(&api.start().await);

    let reply = client.execute(Request::get(USERS)).await.expect("list");
    assert_eq!(
        reply,
        Reply::Json {
            status: 200,
            value: body
        }
    );

    let users: Vec<User> = client.users().list().await.expect("typed list");
    assert_eq!(users[0].username, "amy");
    assert_eq!(users[0].extra.get("badge"), Some(&json!(3)));
}

#[tokio::test]
async fn test_error_message_and_data_come_from_body() {
    let body = json!({"message": "User not found", "code": "E_NO_USER"});
    let api = MockApi::new().json(Method::GET, "/api/v1/admin/users/missing", 404, body.clone());
    let (client, _, _) = signed_in_client(&api.start().await);

    let err = client.users().get("missing").await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "User not found");
    assert_eq!(err.data(), Some(&body));

    let normalized = err.to_normalized();
    assert_eq!(normalized.status, 404);
    assert_eq!(normalized.data, Some(body));
}

#[tokio::test]
async fn test_error_without_json_falls_back_to_status_line() {
    let api = MockApi::new().text(Method::GET, USERS, 500, "<h1>upstream exploded</h1>");
    let (client, _, _) = signed_in_client(&api.start().await);

    let err = client.users().list().await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert_eq!(err.message(), "Error: 500 Internal Server Error");
    assert!(err.data().is_none());
}

#[tokio::test]
async fn test_error_with_blank_message_uses_status_line() {
    let api = MockApi::new().json(Method::POST, USERS, 400, json!({"message": "  "}));
    let (client, _, _) = signed_in_client(&api.start().await);

    let err = client
        .execute(Request::post(USERS).json(&json!({})).expect("body"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(err.message(), "Error: 400 Bad Request");
    assert!(err.data().is_some());
}

#[tokio::test]
async fn test_unreachable_server_is_status_zero() {
    let (client, _, _) = signed_in_client(&unreachable_base_url().await);

    let err = client.users().list().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), 0);
    assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    assert!(err.data().is_none());
}

#[tokio::test]
async fn test_standard_headers_and_bearer_token() {
    let api = MockApi::new().json(Method::GET, USERS, 200, json!([]));
    let (client, _, _) = signed_in_client(&api.start().await);

    client.users().list().await.expect("list");

    let hit = api.hit(&Method::GET, USERS);
    assert_eq!(hit.header("x-api-key").as_deref(), Some(TEST_API_KEY));
    assert_eq!(hit.header("content-type").as_deref(), Some("application/json"));
    assert_eq!(hit.header("authorization").as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn test_public_request_omits_token() {
    let api = MockApi::new().json(Method::GET, "/api/v1/organizations", 200, json!([]));
    let (client, _, _) = signed_in_client(&api.start().await);

    client.organizations().list().await.expect("list");

    let hit = api.hit(&Method::GET, "/api/v1/organizations");
    assert_eq!(hit.header("x-api-key").as_deref(), Some(TEST_API_KEY));
    assert!(hit.header("authorization").is_none());
}

#[tokio::test]
async fn test_missing_token_still_sends_request() {
    let api = MockApi::new().json(Method::GET, USERS, 401, json!({"message": "Unauthorized"}));
    let (client, _, _) = client_for(&api.start().await);

    let err = client.users().list().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Unauthorized");

    let hit = api.hit(&Method::GET, USERS);
    assert!(hit.header("authorization").is_none());
}

#[tokio::test]
async fn test_json_body_is_serialized_camel_case() {
    let api = MockApi::new().json(
        Method::POST,
        "/api/v1/admin/posts",
        201,
        json!({"id": "p1", "title": "Winter coats", "isPublished": true}),
    );
    let (client, _, _) = signed_in_client(&api.start().await);

    let post = client
        .posts()
        .create(&CreatePostRequest {
            title: "Winter coats".to_string(),
            content: "Drop-off at the main branch".to_string(),
            image_url: Some("https://cdn.shelter.org/coats.png".to_string()),
            tags: "winter,donations".to_string(),
            is_published: true,
            ..CreatePostRequest::default()
        })
        .await
        .expect("create");
    assert_eq!(post.id, "p1");
    assert!(post.is_published);

    let sent = api.hit(&Method::POST, "/api/v1/admin/posts").json();
    assert_eq!(sent["title"], "Winter coats");
    assert_eq!(sent["imageUrl"], "https://cdn.shelter.org/coats.png");
    assert_eq!(sent["isPublished"], true);
    assert!(sent.get("subtitle").is_none());
}

#[tokio::test]
async fn test_non_json_success_is_response_shape() {
    let api = MockApi::new().text(Method::GET, USERS, 200, "ok");
    let (client, _, _) = signed_in_client(&api.start().await);

    let err = client.execute(Request::get(USERS)).await.unwrap_err();
    assert!(matches!(err, ApiError::ResponseShape { status: 200, .. }));
    assert_eq!(err.status(), 200);
}

#[tokio::test]
async fn test_unexpected_shape_is_response_shape() {
    let api = MockApi::new().json(Method::GET, USERS, 200, json!({"not": "a list"}));
    let (client, _, _) = signed_in_client(&api.start().await);

    let err = client.users().list().await.unwrap_err();
    assert!(matches!(err, ApiError::ResponseShape { status: 200, .. }));
}

#[tokio::test]
async fn test_no_content_decodes_into_empty_value() {
    let api = MockApi::new()
        .no_content(Method::GET, "/api/v1/admin/settings")
        .no_content(Method::GET, USERS);
    let (client, _, _) = signed_in_client(&api.start().await);

    let nothing: Option<Value> = client
        .fetch(Request::get("/api/v1/admin/settings"))
        .await
        .expect("null decodes into Option");
    assert!(nothing.is_none());

    let users = client.users().list().await.expect("204 decodes as an empty list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let api = MockApi::new()
        .json(Method::GET, USERS, 200, json!([]))
        .json(Method::GET, "/api/v1/admin/posts", 500, json!({"message": "db down"}));
    let (client, _, _) = signed_in_client(&api.start().await);

    let users = client.users();
    let posts = client.posts();
    let (users, posts) = futures::join!(users.list(), posts.list());

    assert!(users.expect("users").is_empty());
    assert_eq!(posts.unwrap_err().message(), "db down");
    assert_eq!(api.hits().len(), 2);
}
