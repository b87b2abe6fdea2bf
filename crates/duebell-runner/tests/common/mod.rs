//! In-process fake Redmine and Slack servers shared by the runner tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Value,
}

/// Spawn a fake Redmine whose `/issues.json` always answers with `body`.
pub async fn spawn_redmine(status: StatusCode, body: Value) -> String {
    let app = Router::new()
        .route(
            "/issues.json",
            get(|State(c): State<Canned>| async move { (c.status, Json(c.body)) }),
        )
        .with_state(Canned { status, body });
    serve(app).await
}

/// A Redmine issue record as the REST API returns it.
pub fn redmine_issue(id: u64, subject: &str, due: &str, assignee: Option<(u64, &str)>) -> Value {
    let mut issue = json!({
        "id": id,
        "subject": subject,
        "due_date": due,
        "project": {"id": 1, "name": "Ops"},
        "status": {"id": 1, "name": "New"},
    });
    if let Some((uid, name)) = assignee {
        issue["assigned_to"] = json!({"id": uid, "name": name});
    }
    issue
}

#[derive(Debug, Clone)]
pub struct SlackPost {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeSlack {
    reply: Canned,
    posts: Arc<Mutex<Vec<SlackPost>>>,
}

async fn post_message(
    State(fake): State<FakeSlack>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.posts.lock().unwrap().push(SlackPost {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });
    (fake.reply.status, Json(fake.reply.body.clone()))
}

pub struct SlackServer {
    pub base_url: String,
    posts: Arc<Mutex<Vec<SlackPost>>>,
}

impl SlackServer {
    pub fn posts(&self) -> Vec<SlackPost> {
        self.posts.lock().unwrap().clone()
    }
}

/// Spawn a fake Slack Web API answering `chat.postMessage` with `body`.
pub async fn spawn_slack(status: StatusCode, body: Value) -> SlackServer {
    let posts = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/chat.postMessage", post(post_message))
        .with_state(FakeSlack {
            reply: Canned { status, body },
            posts: posts.clone(),
        });
    SlackServer {
        base_url: serve(app).await,
        posts,
    }
}

pub async fn spawn_slack_ok() -> SlackServer {
    spawn_slack(
        StatusCode::OK,
        json!({"ok": true, "channel": "C123", "ts": "1700000000.000100"}),
    )
    .await
}
