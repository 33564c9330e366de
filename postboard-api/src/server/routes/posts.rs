use crate::server::{Result, ServerError, ServerRouter, json::Json};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Id,
    post::{Post, PostMarker},
};
use postboard_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct GetPostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { id }: GetPostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db
        .fetch_post(id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use crate::server::test_util::{TestApp, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn get_post_by_id() {
        let TestApp { app, .. } = TestApp::new().await;
        send(&app, Method::POST, "/users", Some(json!({ "name": "Ada" }))).await;
        send(
            &app,
            Method::POST,
            "/users/1/posts",
            Some(json!({ "text": "hello" })),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/posts/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1, "user_id": 1, "text": "hello" }));

        let (status, body) = send(&app, Method::GET, "/posts/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "post not found" }));
    }

    #[tokio::test]
    async fn posts_of_deleted_users_are_gone() {
        let TestApp { app, .. } = TestApp::new().await;
        send(&app, Method::POST, "/users", Some(json!({ "name": "Ada" }))).await;
        send(
            &app,
            Method::POST,
            "/users/1/posts",
            Some(json!({ "text": "hello" })),
        )
        .await;

        send(&app, Method::DELETE, "/users/1", None).await;

        let (status, _) = send(&app, Method::GET, "/posts/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
