use crate::server::{ServerError, json};
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum ValidationError {
    #[error("missing required name")]
    MissingName,
    #[error("missing required text")]
    MissingText,
}

/// A raw request body that has to be checked before a handler may use it.
///
/// The `Default` value is a body without any fields.
pub trait Validate: Default {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationError>;
}

/// Extracts a JSON body of type `B` and yields its validated form.
///
/// A request without a JSON object body is validated as `B::default()`, so it
/// fails on its first missing field. Must be the last extractor of a handler,
/// after every path and existence step.
pub struct Valid<B: Validate>(pub B::Valid);

impl<B, S> FromRequest<S> for Valid<B>
where
    B: Validate + DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = json::read_object::<B, S>(request, state)
            .await?
            .unwrap_or_default();

        Ok(Self(body.validate()?))
    }
}
