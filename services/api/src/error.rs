use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use moviewatch_auth_types::bearer::BearerError;
use moviewatch_auth_types::token::AuthError;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API error variants. Every failure leaves the process through this type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("authorization token missing")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("insufficient permissions")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("movie not found")]
    MovieNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("watchlist not found")]
    WatchlistNotFound,
    #[error("movie not in watchlist")]
    WatchlistMovieNotFound,
    #[error("route not found")]
    RouteNotFound,
    #[error("username or email already in use")]
    UserAlreadyExists,
    #[error("you have already reviewed this movie")]
    DuplicateReview,
    #[error("movie already in watchlist")]
    MovieAlreadyInWatchlist,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MovieNotFound => "MOVIE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::WatchlistNotFound => "WATCHLIST_NOT_FOUND",
            Self::WatchlistMovieNotFound => "WATCHLIST_MOVIE_NOT_FOUND",
            Self::RouteNotFound => "ROUTE_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::DuplicateReview => "DUPLICATE_REVIEW",
            Self::MovieAlreadyInWatchlist => "MOVIE_ALREADY_IN_WATCHLIST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::MovieNotFound
            | Self::ReviewNotFound
            | Self::WatchlistNotFound
            | Self::WatchlistMovieNotFound
            | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::DuplicateReview | Self::MovieAlreadyInWatchlist => {
                StatusCode::CONFLICT
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BearerError> for ApiError {
    fn from(e: BearerError) -> Self {
        match e {
            BearerError::Missing => Self::MissingToken,
            BearerError::InvalidScheme => Self::InvalidToken,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Signing(err) => Self::Internal(anyhow::Error::new(err).context("sign token")),
            rejected => {
                tracing::debug!(error = %rejected, "token rejected");
                Self::InvalidToken
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let name = camel_case(field.as_ref());
                errs.iter().map(move |e| FieldError {
                    field: name.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{name} is invalid")),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation(fields)
    }
}

/// `release_year` -> `releaseYear`, matching the JSON field names.
fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only. TraceLayer already records method/uri/status for every request.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref fields) = self {
            body["errors"] = serde_json::json!(fields);
        }
        (status, axum::Json(body)).into_response()
    }
}
