//! Bearer-token helpers for tests.
//!
//! Tokens are signed with the same routine the API uses, so requests built
//! here go through the real verification path.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use jsonwebtoken::{EncodingKey, Header, encode};
use moviewatch_auth_types::token::{Claims, issue_token};
use moviewatch_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Identity to sign into a test token.
pub struct MockAuth {
    pub user_id: i32,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user(user_id: i32) -> Self {
        Self::new(user_id, UserRole::User)
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn token(&self) -> String {
        issue_token(
            self.user_id,
            self.role,
            TEST_JWT_SECRET,
            Duration::from_secs(900),
        )
        .unwrap()
        .token
    }

    /// Token that expired an hour ago, well past the verifier's leeway.
    pub fn expired_token(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: self.user_id.to_string(),
            role: self.role,
            iat: now - 7200,
            exp: now - 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    /// `Authorization` header value, e.g. `Bearer eyJ...`.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(&self.bearer()).unwrap());
        map
    }
}
