use crate::server::{ServerState, app};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use postboard_db::client::DbClient;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub db: Arc<DbClient>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = DbClient::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let db = Arc::new(db);

        let app = app(ServerState {
            db_client: Arc::clone(&db),
        });

        Self { app, db }
    }
}

/// Sends one request through the app and returns the status with the parsed
/// JSON body, or `Value::Null` for an empty body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    read_response(app.clone().oneshot(request).await.unwrap()).await
}

/// Sends a body verbatim, with the given content type if any.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&'static str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    let request = request.body(Body::from(body)).unwrap();

    read_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn read_response(response: Response) -> (StatusCode, Value) {
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
