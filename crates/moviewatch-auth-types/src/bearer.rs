//! `Authorization: Bearer <token>` parsing.

/// Why a header did not yield a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("authorization header missing")]
    Missing,
    #[error("authorization header is not a bearer token")]
    InvalidScheme,
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively. An empty token counts as an
/// invalid scheme rather than a missing header.
pub fn token_from_header(header: Option<&str>) -> Result<&str, BearerError> {
    let value = header.ok_or(BearerError::Missing)?.trim();
    let (scheme, token) = value.split_once(' ').ok_or(BearerError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::InvalidScheme);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::InvalidScheme);
    }
    Ok(token)
}
