//! Extractors whose rejections are [`RequestError`]s, so malformed ids,
//! query strings and bodies answer with the same `{msg}` shape as every
//! other failure.

use axum::body::HttpBody;
use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::{request::Parts, Request};
use axum::{BoxError, Json};
use serde::de::DeserializeOwned;

use crate::errors::RequestError;

/// A numeric id taken from the single path parameter of the route. Only
/// plain ASCII digits are accepted, so signs and whitespace are rejected.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "path rejected");
                RequestError::InvalidInput
            })?;

        match parse_id(&raw) {
            Some(id) => Ok(ResourceId(id)),
            None => {
                tracing::debug!(id = %raw, "non-numeric id");
                Err(RequestError::InvalidInput)
            }
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(QueryParams(params)),
            Err(rejection) => {
                tracing::debug!(%rejection, "query string rejected");
                Err(RequestError::InvalidInput)
            }
        }
    }
}

pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, B, T> FromRequest<S, B> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) => {
                tracing::debug!(%rejection, "body rejected");
                Err(RequestError::InvalidInput)
            }
        }
    }
}
