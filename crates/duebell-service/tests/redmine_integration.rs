//! Integration tests for RedmineService against an in-process fake Redmine.
//!
//! Each test spawns an axum server on 127.0.0.1:0 that records the query
//! string and API key header of every request and replies with a canned body.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use duebell_service::{IssueTracker, OverdueQuery, RedmineService, ServiceError};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct SeenRequest {
    params: HashMap<String, String>,
    api_key: Option<String>,
}

#[derive(Clone)]
struct FakeRedmine {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn issues_handler(
    State(fake): State<FakeRedmine>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    fake.seen.lock().unwrap().push(SeenRequest {
        params,
        api_key: headers
            .get("x-redmine-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });
    (fake.status, Json(fake.body.clone()))
}

async fn spawn_fake(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeRedmine {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/issues.json", get(issues_handler))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn query() -> OverdueQuery {
    OverdueQuery::as_of("2024-05-01".parse().unwrap())
}

#[tokio::test]
async fn fetch_sends_filters_and_api_key() {
    let (url, seen) = spawn_fake(StatusCode::OK, json!({"issues": [], "total_count": 0})).await;
    let svc = RedmineService::new(&url, "secret-key".into());

    let issues = svc.fetch_overdue_issues(&query()).await.unwrap();
    assert!(issues.is_empty());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let req = &seen[0];
    assert_eq!(req.api_key.as_deref(), Some("secret-key"));
    assert_eq!(req.params["status_id"], "open");
    assert_eq!(req.params["due_date"], "<=2024-05-01");
    assert_eq!(req.params["sort"], "due_date:asc");
}

#[tokio::test]
async fn fetch_maps_fields_and_orders_by_due_date() {
    let body = json!({
        "issues": [
            {"id": 12, "subject": "Later", "due_date": "2024-04-30",
             "project": {"id": 1, "name": "Web"}},
            {"id": 11, "subject": "Earlier", "due_date": "2024-04-01",
             "project": {"id": 2, "name": "Billing"},
             "assigned_to": {"id": 42, "name": "Taro Yamada"}},
            {"id": 13, "subject": "Same day", "due_date": "2024-04-30",
             "project": {"id": 1, "name": "Web"}}
        ],
        "total_count": 3
    });
    let (url, _seen) = spawn_fake(StatusCode::OK, body).await;
    let svc = RedmineService::new(&url, "k".into());

    let issues = svc.fetch_overdue_issues(&query()).await.unwrap();
    let ids: Vec<u64> = issues.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![11, 12, 13]);
    assert!(issues.windows(2).all(|w| w[0].due_date <= w[1].due_date));

    let first = &issues[0];
    assert_eq!(first.title, "Earlier");
    assert_eq!(first.url, format!("{url}/issues/11"));
    assert_eq!(first.project.name, "Billing");
    let assignee = first.assigned_to.as_ref().unwrap();
    assert_eq!(assignee.id, "42");
    assert_eq!(assignee.name, "Taro Yamada");
    assert!(issues[1].assigned_to.is_none());
}

#[tokio::test]
async fn unauthorized_is_reported() {
    let (url, _seen) = spawn_fake(
        StatusCode::UNAUTHORIZED,
        json!({"errors": ["Invalid API key"]}),
    )
    .await;
    let svc = RedmineService::new(&url, "wrong".into());

    let err = svc.fetch_overdue_issues(&query()).await.unwrap_err();
    assert!(
        matches!(err, ServiceError::Unauthorized(ref msg) if msg == "Invalid API key"),
        "expected Unauthorized, got {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let (url, _seen) = spawn_fake(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let svc = RedmineService::new(&url, "k".into());

    let err = svc.fetch_overdue_issues(&query()).await.unwrap_err();
    assert!(
        matches!(err, ServiceError::Status { status: 500, .. }),
        "expected Status, got {err:?}"
    );
}

#[tokio::test]
async fn long_error_body_is_truncated() {
    let (url, _seen) = spawn_fake(
        StatusCode::BAD_GATEWAY,
        json!({"detail": "x".repeat(4096)}),
    )
    .await;
    let svc = RedmineService::new(&url, "k".into());

    let err = svc.fetch_overdue_issues(&query()).await.unwrap_err();
    match err {
        ServiceError::Status { status, body } => {
            assert_eq!(status, 502);
            assert!(body.ends_with("..."));
            assert_eq!(body.chars().count(), 512 + 3);
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_body_is_decode_error() {
    let (url, _seen) = spawn_fake(StatusCode::OK, json!({"projects": []})).await;
    let svc = RedmineService::new(&url, "k".into());

    let err = svc.fetch_overdue_issues(&query()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let svc = RedmineService::new(&format!("http://{addr}"), "k".into());
    let err = svc.fetch_overdue_issues(&query()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Connection(_)), "got {err:?}");
}
