use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts, Path, rejection::PathRejection},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use postboard_common::model::{
    Id,
    user::{User, UserMarker},
};
use postboard_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;

/// A user resolved from the `{id}` segment of the request path.
///
/// Rejects with `404 user not found` if no such user exists, so handlers taking
/// this extractor only run for existing users.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ExistingUser(pub User);

#[derive(Deserialize)]
struct UserIdParam {
    id: Id<UserMarker>,
}

impl<S> FromRequestParts<S> for ExistingUser
where
    Arc<DbClient>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(UserIdParam { id }) = Path::<UserIdParam>::from_request_parts(parts, state)
            .await
            .map_err(ServerError::InvalidUserId)?;

        let user = Arc::<DbClient>::from_ref(state)
            .fetch_user(id)
            .await?
            .ok_or(ServerError::UserByIdNotFound(id))?;

        Ok(Self(user))
    }
}

/// Path rejection for routes under `/users/{id}`. An id that does not parse
/// cannot name a user, so it is reported like a missing user.
#[derive(Debug)]
pub struct UserPathRejection(PathRejection);

impl From<PathRejection> for UserPathRejection {
    fn from(value: PathRejection) -> Self {
        Self(value)
    }
}

impl From<UserPathRejection> for ServerError {
    fn from(value: UserPathRejection) -> Self {
        ServerError::InvalidUserId(value.0)
    }
}

impl IntoResponse for UserPathRejection {
    fn into_response(self) -> Response {
        ServerError::from(self).into_response()
    }
}
