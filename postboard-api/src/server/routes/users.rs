use crate::server::{
    Result, ServerError, ServerRouter,
    existence::{ExistingUser, UserPathRejection},
    json::Json,
    validation::{Valid, Validate, ValidationError},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Id,
    post::{Post, PostText},
    user::{NewUser, User, UserMarker, UserName},
};
use postboard_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_users)
        .typed_post(create_user)
        .typed_get(get_user)
        .typed_put(update_user)
        .typed_delete(delete_user)
        .typed_get(get_user_posts)
        .typed_post(create_user_post)
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
struct UserBody {
    name: Option<String>,
}

impl Validate for UserBody {
    type Valid = NewUser;

    fn validate(self) -> Result<NewUser, ValidationError> {
        let name = UserName::new(self.name.unwrap_or_default())
            .map_err(|_| ValidationError::MissingName)?;

        Ok(NewUser { name })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
struct PostBody {
    text: Option<String>,
}

impl Validate for PostBody {
    type Valid = PostText;

    fn validate(self) -> Result<PostText, ValidationError> {
        PostText::new(self.text.unwrap_or_default()).map_err(|_| ValidationError::MissingText)
    }
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users", rejection(ServerError))]
struct UsersPath();

async fn get_users(
    UsersPath(): UsersPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Vec<User>>> {
    let users = db.fetch_users().await?;

    Ok(Json(users))
}

async fn create_user(
    UsersPath(): UsersPath,
    State(db): State<Arc<DbClient>>,
    Valid(user): Valid<UserBody>,
) -> Result<(StatusCode, Json<User>)> {
    let user = db.create_user(&user).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}", rejection(UserPathRejection))]
struct UserPath {
    id: Id<UserMarker>,
}

async fn get_user(UserPath { .. }: UserPath, ExistingUser(user): ExistingUser) -> Json<User> {
    Json(user)
}

async fn update_user(
    UserPath { .. }: UserPath,
    State(db): State<Arc<DbClient>>,
    ExistingUser(User { id, .. }): ExistingUser,
    Valid(update): Valid<UserBody>,
) -> Result<Json<User>> {
    if !db.update_user(id, &update).await? {
        return Err(ServerError::UserByIdNotFound(id));
    }

    let user = db
        .fetch_user(id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(id))?;

    Ok(Json(user))
}

async fn delete_user(
    UserPath { .. }: UserPath,
    State(db): State<Arc<DbClient>>,
    ExistingUser(user): ExistingUser,
) -> Result<Json<User>> {
    if !db.delete_user(user.id).await? {
        return Err(ServerError::UserByIdNotFound(user.id));
    }

    Ok(Json(user))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/users/{id}/posts", rejection(UserPathRejection))]
struct UserPostsPath {
    id: Id<UserMarker>,
}

async fn get_user_posts(
    UserPostsPath { .. }: UserPostsPath,
    State(db): State<Arc<DbClient>>,
    ExistingUser(user): ExistingUser,
) -> Result<Json<Vec<Post>>> {
    let posts = db.fetch_user_posts(user.id).await?;

    Ok(Json(posts))
}

async fn create_user_post(
    UserPostsPath { .. }: UserPostsPath,
    State(db): State<Arc<DbClient>>,
    ExistingUser(user): ExistingUser,
    Valid(text): Valid<PostBody>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = db.create_post(user.id, &text).await?;

    Ok((StatusCode::CREATED, Json(post)))
}
