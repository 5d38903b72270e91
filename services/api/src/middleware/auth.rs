//! Authentication and role/ownership gates.
//!
//! `authenticate` must wrap every gate below it: gates read the [`Identity`]
//! it stores in the request extensions and reject with 401 when it is absent.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::policy::{self, OwnerId};
use crate::domain::types::Identity;
use crate::error::ApiError;
use crate::handlers::extract::ApiPath;
use crate::state::AppState;
use crate::usecase::auth::AuthenticateUseCase;

fn authorization_header(request: &Request) -> Result<Option<String>, ApiError> {
    request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map(str::to_owned)
                .map_err(|_| ApiError::InvalidToken)
        })
        .transpose()
}

async fn resolve(state: &AppState, header: Option<&str>) -> Result<Identity, ApiError> {
    AuthenticateUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    }
    .execute(header)
    .await
}

/// Require a valid bearer token and attach the caller's [`Identity`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = authorization_header(&request)?;
    let identity = resolve(&state, header.as_deref()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Like [`authenticate`] but lets requests without an `Authorization`
/// header through anonymously. A header that is present must still be valid.
pub async fn authenticate_optional(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(header) = authorization_header(&request)? {
        let identity = resolve(&state, Some(&header)).await?;
        request.extensions_mut().insert(identity);
    }
    Ok(next.run(request).await)
}

/// 403 unless the caller is an admin.
pub async fn require_admin(
    identity: Identity,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    policy::require_admin(&identity)?;
    Ok(next.run(request).await)
}

/// 403 unless the caller is the user named by the `{id}` path segment, or an admin.
pub async fn require_path_owner_or_admin(
    identity: Identity,
    ApiPath(user_id): ApiPath<i32>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    policy::require_owner_or_admin(&identity, &OwnerId(user_id))?;
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    // Extract synchronously, then return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<Identity>().copied();
        async move { identity.ok_or(ApiError::MissingToken) }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<Identity>().copied();
        async move { Ok(identity) }
    }
}
