//! Extractors that reject with [`ApiError`] instead of axum's plain-text
//! rejections, and run `validator` rules on the decoded value.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body, deserialized then validated.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request(
        req: Request,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let extracted = Json::<T>::from_request(req, state);
        async move {
            let Json(value) = extracted
                .await
                .map_err(|rejection| ApiError::invalid("body", rejection.body_text()))?;
            value.validate()?;
            Ok(Self(value))
        }
    }
}

/// Query string, deserialized then validated.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    // Extract synchronously, then return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let extracted = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::invalid("query", rejection.body_text()))
            .and_then(|Query(value)| {
                value.validate()?;
                Ok(Self(value))
            });
        async move { extracted }
    }
}

/// Unwrap a field already checked by a `required` rule.
pub fn present<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::invalid(field, format!("{field} is required")))
}

/// Trimmed value, or `None` when blank. Used for optional text filters.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Path parameters. A non-numeric id is a 400, not a 404.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let extracted = Path::<T>::from_request_parts(parts, state);
        async move {
            extracted
                .await
                .map(|Path(value)| Self(value))
                .map_err(|rejection| ApiError::invalid("params", rejection.body_text()))
        }
    }
}
