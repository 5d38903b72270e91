use std::time::Duration;

use anyhow::Context as _;
use tracing::info;

use moviewatch_auth_types::bearer::token_from_header;
use moviewatch_auth_types::password::{hash_password, verify_password};
use moviewatch_auth_types::token::{issue_token, verify_token};
use moviewatch_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{Identity, NewUser, User};
use crate::error::ApiError;

// bcrypt runs on the blocking pool.

pub(crate) async fn hash_off_thread(plain: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("join password hasher")?
        .context("hash password")?;
    Ok(hash)
}

async fn verify_off_thread(plain: String, hash: String) -> Result<bool, ApiError> {
    let matches = tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("join password verifier")?
        .context("verify password")?;
    Ok(matches)
}

// ── Authenticate ─────────────────────────────────────────────────────────────

/// Resolve an `Authorization` header to the calling user.
///
/// Missing header is `MissingToken`; a bad scheme, bad token, or a token
/// whose user no longer exists is `InvalidToken`.
pub struct AuthenticateUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> AuthenticateUseCase<U> {
    pub async fn execute(&self, authorization: Option<&str>) -> Result<Identity, ApiError> {
        let token = token_from_header(authorization)?;
        let claims = verify_token(token, &self.jwt_secret)?;
        let user_id = claims.user_id()?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;
        Ok(Identity {
            user_id: user.id,
            role: user.role,
        })
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, ApiError> {
        if self
            .users
            .find_conflicting(Some(&input.username), Some(&input.email), None)
            .await?
            .is_some()
        {
            return Err(ApiError::UserAlreadyExists);
        }
        let password_hash = hash_off_thread(input.password).await?;
        let user = self
            .users
            .create(&NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: UserRole::User,
            })
            .await?;
        info!(user_id = user.id, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub expires_at: u64,
    pub user: User,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl<U: UserRepository> LoginUseCase<U> {
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_off_thread(input.password, user.password_hash.clone()).await? {
            return Err(ApiError::InvalidCredentials);
        }
        let issued = issue_token(user.id, user.role, &self.jwt_secret, self.token_ttl)?;
        info!(user_id = user.id, "user logged in");
        Ok(LoginOutput {
            token: issued.token,
            expires_at: issued.exp,
            user,
        })
    }
}
