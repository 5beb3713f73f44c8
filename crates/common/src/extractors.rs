//! Custom axum extractors for Chatline

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::{Error, Result};

/// Largest history page a single request may ask for
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Query parameters for the history endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct HistoryQuery {
    #[serde(default)]
    #[validate(range(min = 0, message = "limit must be a non-negative integer"))]
    pub limit: Option<i64>,
}

impl HistoryQuery {
    /// Resolve the requested limit, capped at 200 and never negative.
    ///
    /// `None` means the caller did not ask for a specific page size. Zero is a
    /// valid limit and yields an empty page.
    pub fn limit(&self) -> Result<Option<usize>> {
        match self.limit {
            None => Ok(None),
            Some(n) if n < 0 => Err(Error::Validation(format!(
                "limit must be a non-negative integer, got {}",
                n
            ))),
            Some(n) => Ok(Some(
                usize::try_from(n)
                    .unwrap_or(MAX_HISTORY_LIMIT)
                    .min(MAX_HISTORY_LIMIT),
            )),
        }
    }
}

/// JSON extractor that validates the deserialized value automatically.
///
/// Replaces `Json<T>` + manual `.validate()` calls in handlers.
/// Requires `T: DeserializeOwned + Validate`.
///
/// All input errors (deserialization + validation) return 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Rejection type for `ValidatedJson`:
/// - Oversized bodies → 413, unchanged
/// - JSON deserialization errors → 400 (via `Error::Validation`)
/// - Validation errors → 400 (via `Error::Validation`)
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Validation(Error),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            ValidatedJsonRejection::Json(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                e.into_response()
            }
            ValidatedJsonRejection::Json(e) => Error::Validation(e.body_text()).into_response(),
            ValidatedJsonRejection::Validation(e) => e.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(|e| {
            ValidatedJsonRejection::Validation(Error::Validation(format!(
                "Validation failed: {}",
                e
            )))
        })?;
        Ok(ValidatedJson(value))
    }
}

/// Query-string extractor that validates the deserialized value.
///
/// Unparseable parameters and validation failures both become
/// `Error::Validation` (400 with the JSON error body).
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;
        value
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;
        Ok(ValidatedQuery(value))
    }
}
