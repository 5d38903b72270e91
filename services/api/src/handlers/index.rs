use crate::error::ApiError;

pub const BANNER: &str = concat!("moviewatch api ", env!("CARGO_PKG_VERSION"));

/// `GET /`
pub async fn index() -> &'static str {
    BANNER
}

/// Any unmatched route.
pub async fn fallback() -> ApiError {
    ApiError::RouteNotFound
}
