use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{BytesRejection, JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
};
use json::Json;
use postboard_common::model::{Id, post::PostMarker, user::UserMarker};
use postboard_db::client::{DbClient, DbError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};
use validation::ValidationError;

mod existence;
mod json;
mod logger;
mod routes;
#[cfg(test)]
mod test_util;
mod validation;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

/// The complete request pipeline: request logging, then the per-route
/// validation steps and handlers.
pub fn app(state: ServerState) -> Router {
    routes()
        .layer(middleware::from_fn(logger::log_request))
        .with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("User id in path rejected: {0}")]
    InvalidUserId(PathRejection),
    #[error("Request body could not be read: {0}")]
    BodyRejection(#[from] BytesRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Incoming JSON object has invalid fields: {0}")]
    InvalidJsonBody(serde_json::Error),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Request body failed validation: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
    #[error("User with id {0} was not found.")]
    UserByIdNotFound(Id<UserMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::InvalidUserId(_)
            | ServerError::PostByIdNotFound(_)
            | ServerError::UserByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BodyRejection(rejection) => rejection.status(),
            ServerError::JsonRejection(_)
            | ServerError::InvalidJsonBody(_)
            | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to clients. Server-side failures never expose their details.
    pub fn client_message(&self) -> String {
        match self {
            ServerError::UnknownRoute(_) => "route not found".to_owned(),
            ServerError::PathRejection(rejection) => rejection.body_text(),
            ServerError::InvalidUserId(_) | ServerError::UserByIdNotFound(_) => {
                "user not found".to_owned()
            }
            ServerError::PostByIdNotFound(_) => "post not found".to_owned(),
            ServerError::BodyRejection(rejection) => rejection.body_text(),
            ServerError::JsonRejection(rejection) => rejection.body_text(),
            ServerError::InvalidJsonBody(error) => error.to_string(),
            ServerError::Validation(error) => error.to_string(),
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                "internal server error".to_owned()
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = %self, %status, "Replying with error");
        }

        let error_response = ErrorResponse {
            message: self.client_message(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::test_util::{TestApp, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let TestApp { app, .. } = TestApp::new().await;

        let (status, body) = send(&app, Method::GET, "/nothing/here", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "route not found" }));
    }

    #[tokio::test]
    async fn database_failures_hide_details() {
        let TestApp { app, db } = TestApp::new().await;
        db.close().await;

        let (status, body) = send(&app, Method::GET, "/users", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "internal server error" }));
    }

    #[tokio::test]
    async fn failed_user_lookup_is_not_reported_as_missing() {
        let TestApp { app, db } = TestApp::new().await;
        db.close().await;

        let (status, _) = send(&app, Method::GET, "/users/1", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let TestApp { app, .. } = TestApp::new().await;

        let (status, body) = send(&app, Method::POST, "/users", Some(json!({ "name": 5 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}
