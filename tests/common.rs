use gitlab_dm_relay::{
    config::Config,
    relay::{Relay, RelayHandle},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

pub const BOT_ID: &str = "bot-user-id";

pub fn test_config(mattermost_url: &str, gitlab_url: &str) -> Config {
    Config {
        mattermost_url: mattermost_url.to_string(),
        mattermost_token: "mm-token".to_string(),
        mattermost_bot_user_id: BOT_ID.to_string(),
        gitlab_url: gitlab_url.to_string(),
        gitlab_token: "gl-token".to_string(),
        server_port: 0,
        request_timeout_seconds: 5,
        dispatch_concurrency: 4,
        accept_invalid_certs: false,
        attachment_color: "#db3b21".to_string(),
    }
}

pub fn test_relay(mattermost: &MockServer, gitlab: &MockServer) -> Relay {
    Relay::new(test_config(&mattermost.uri(), &gitlab.uri())).expect("valid test config")
}

pub fn test_handle(mattermost: &MockServer, gitlab: &MockServer) -> RelayHandle {
    RelayHandle::new(test_relay(mattermost, gitlab))
}

pub fn merge_request_event(author: &str, assignees: &[&str]) -> Value {
    let assignees: Vec<Value> = assignees
        .iter()
        .map(|username| json!({ "username": username, "name": username }))
        .collect();

    json!({
        "object_kind": "merge_request",
        "event_type": "merge_request",
        "user": { "username": author, "name": "Alice" },
        "object_attributes": {
            "action": "opened",
            "title": "Fix bug",
            "url": "https://g/mr/1",
            "description": "desc"
        },
        "project": {
            "id": 7,
            "namespace": "team",
            "name": "repo",
            "homepage": "https://g/team/repo"
        },
        "assignees": assignees
    })
}

pub fn merge_request_note_event(author: &str) -> Value {
    json!({
        "object_kind": "note",
        "event_type": "note",
        "user": { "username": author, "name": "Carol" },
        "project_id": 7,
        "project": {
            "id": 7,
            "namespace": "team",
            "name": "repo",
            "homepage": "https://g/team/repo"
        },
        "object_attributes": {
            "note": "Looks good to me",
            "noteable_type": "MergeRequest",
            "url": "https://g/mr/1#note_99"
        },
        "merge_request": { "iid": 1, "title": "Fix bug" }
    })
}

pub fn discussion(authors: &[&str]) -> Value {
    let notes: Vec<Value> = authors
        .iter()
        .map(|username| json!({ "author": { "username": username }, "system": false }))
        .collect();

    json!({ "id": format!("d-{}", authors.join("-")), "notes": notes })
}

pub async fn mock_discussions(gitlab: &MockServer, discussions: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v4/projects/7/merge_requests/1/discussions"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discussions))
        .mount(gitlab)
        .await;
}

/// Mocks the full user -> direct channel -> post chain for one recipient, expecting exactly
/// one post.
pub async fn mock_deliverable_user(mattermost: &MockServer, username: &str) {
    let user_id = format!("{}-id", username);
    let channel_id = format!("{}-channel", username);

    Mock::given(method("GET"))
        .and(path(format!("/api/v4/users/username/{}", username)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": user_id, "username": username })),
        )
        .mount(mattermost)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v4/channels/direct"))
        .and(body_json(json!([BOT_ID, user_id])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": channel_id })))
        .mount(mattermost)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v4/posts"))
        .and(wiremock::matchers::body_partial_json(json!({ "channel_id": channel_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": format!("{}-post", username),
            "channel_id": channel_id
        })))
        .expect(1)
        .mount(mattermost)
        .await;
}

pub async fn mock_unknown_user(mattermost: &MockServer, username: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/users/username/{}", username)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "app.user.missing_account.const",
            "message": "Unable to find an existing account matching your username for this team.",
            "status_code": 404
        })))
        .mount(mattermost)
        .await;
}

/// Any post reaching this server fails the test when the server is dropped.
pub async fn expect_no_posts(mattermost: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v4/posts"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(mattermost)
        .await;
}
