use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use db::DBService;
use serde_json::{Value, json};
use server::{AppState, app};
use services::services::{line_api::LineApi, telegram_api::TelegramApi};
use tower::ServiceExt;

async fn test_app() -> Router {
    test_app_with_upstream("http://127.0.0.1:1").await
}

async fn test_app_with_upstream(upstream: &str) -> Router {
    let db = DBService::new_in_memory().await.expect("in-memory db");
    let state = AppState {
        db,
        line: LineApi::with_base_url(upstream).unwrap(),
        telegram: TelegramApi::with_base_url(upstream).unwrap(),
    };
    app(state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn project_crud_roundtrip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/projects",
            json!({ "name": "CRM rollout", "budget": 9000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["status"], "planning");

    // Nested task creation under the project.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/projects/{id}/tasks"),
            json!({ "title": "Import contacts", "priority": "high" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = body_json(response).await;
    assert_eq!(task["data"]["priority"], "high");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/projects/{id}/tasks")))
        .await
        .unwrap();
    let tasks = body_json(response).await;
    assert_eq!(tasks["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/projects/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/projects/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_project_name_is_rejected() {
    let app = test_app().await;
    let response = app
        .oneshot(json_request("POST", "/api/projects", json!({ "name": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_collects_and_dedups_users() {
    let app = test_app().await;

    let delivery = |text: &str| {
        json!({
            "events": [{
                "type": "message",
                "source": { "type": "user", "userId": "U42" },
                "message": { "type": "text", "id": "m1", "text": text },
                "timestamp": 1700000000000i64
            }]
        })
    };

    // First sighting: one new user.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/line/webhook", delivery("hello")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["new_users"], 1);

    // Same user again: updated, not duplicated.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/line/webhook", delivery("second")))
        .await
        .unwrap();
    let summary = body_json(response).await;
    assert_eq!(summary["new_users"], 0);
    assert_eq!(summary["updated"], 1);

    let response = app
        .clone()
        .oneshot(get_request("/api/line/collected-users"))
        .await
        .unwrap();
    let users = body_json(response).await;
    let list = users["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["last_message"], "second");

    // DELETE truncates the collection.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/line/collected-users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/line/collected-users"))
        .await
        .unwrap();
    let users = body_json(response).await;
    assert!(users["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_acknowledges_malformed_payload() {
    let app = test_app().await;
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/line/webhook",
            json!({ "events": "not-an-array" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["processed"], 0);
}

// The platform retries deliveries that are not answered with 200, so even
// requests the JSON extractor would reject must be acknowledged.
#[tokio::test]
async fn webhook_acknowledges_syntactically_broken_body() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/line/webhook")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not-json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["processed"], 0);
    assert_eq!(summary["failed"], 0);
}

#[tokio::test]
async fn webhook_acknowledges_without_content_type_header() {
    let app = test_app().await;
    let delivery = json!({
        "events": [{
            "type": "message",
            "source": { "type": "user", "userId": "U99" },
            "message": { "type": "text", "id": "m9", "text": "hi" }
        }]
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/line/webhook")
                .body(Body::from(delivery.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["new_users"], 1);
}

#[tokio::test]
async fn manual_collect_matches_webhook_semantics() {
    let app = test_app().await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/line/collected-groups",
                json!({ "groupId": "G1", "lastMessage": "ping" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request("/api/line/collected-groups"))
        .await
        .unwrap();
    let groups = body_json(response).await;
    assert_eq!(groups["data"].as_array().unwrap().len(), 1);
}

// Sequential on purpose: both cases manipulate the same process-wide
// environment variables.
#[tokio::test]
async fn relay_token_handling_and_upstream_echo() {
    unsafe {
        std::env::remove_var("LINE_CHANNEL_ACCESS_TOKEN");
        std::env::remove_var("TELEGRAM_BOT_TOKEN");
    }

    // Missing token: 400 before any outbound call.
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/line/send",
            json!({ "to": "U42", "messages": [{ "type": "text", "text": "hi" }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("LINE_CHANNEL_ACCESS_TOKEN")
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/telegram/send",
            json!({ "chat_id": "7", "text": "hi" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Upstream failure: status code and body come back verbatim.
    let stub = Router::new()
        .route(
            "/v2/bot/message/push",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    r#"{"message":"Invalid channel access token"}"#,
                )
            }),
        )
        .route(
            "/v2/bot/profile/{user_id}",
            get(|| async { (StatusCode::OK, r#"{"displayName":"Somchai","userId":"U42"}"#) }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    unsafe {
        std::env::set_var("LINE_CHANNEL_ACCESS_TOKEN", "test-token");
    }

    let app = test_app_with_upstream(&format!("http://{addr}")).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/line/send",
            json!({ "to": "U42", "messages": [{ "type": "text", "text": "hi" }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], br#"{"message":"Invalid channel access token"}"#);

    // Success path passes the provider's JSON through untouched.
    let response = app
        .oneshot(get_request("/api/line/profile/U42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["displayName"], "Somchai");

    unsafe {
        std::env::remove_var("LINE_CHANNEL_ACCESS_TOKEN");
    }
}
