use crate::server::{Result, ServerError};
use axum::{
    Json as AxumJson,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// JSON response whose serialization failures are reported as [`ServerError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(json) => (TypedHeader(ContentType::json()), json).into_response(),
            Err(err) => ServerError::JsonResponse(err).into_response(),
        }
    }
}

/// Reads the fields of a JSON object body.
///
/// A body without a JSON content type, an empty body and a JSON value that is
/// not an object carry no fields and yield `None`. Malformed JSON and object
/// fields of the wrong type are rejected.
pub async fn read_object<T, S>(request: Request, state: &S) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    if !has_json_content_type(request.headers()) {
        return Ok(None);
    }

    let bytes = Bytes::from_request(request, state).await?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let AxumJson(value) = AxumJson::<Value>::from_bytes(&bytes)?;
    if !value.is_object() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(ServerError::InvalidJsonBody)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
