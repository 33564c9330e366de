use axum::{extract::Request, middleware::Next, response::Response};
use time::{UtcDateTime, format_description::well_known::Rfc3339};
use tracing::{info, warn};

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method();
    let path = request.uri().path();

    match UtcDateTime::now().format(&Rfc3339) {
        Ok(timestamp) => info!(%method, path, %timestamp, "Incoming request"),
        Err(err) => {
            warn!(error = %err, "Could not format request timestamp");
            info!(%method, path, "Incoming request");
        }
    }

    next.run(request).await
}
