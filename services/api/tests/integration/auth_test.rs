use moviewatch_api::domain::types::Identity;
use moviewatch_api::error::ApiError;
use moviewatch_api::usecase::auth::AuthenticateUseCase;
use moviewatch_domain::user::UserRole;
use moviewatch_testing::auth::{MockAuth, TEST_JWT_SECRET};

use crate::helpers::MemoryDb;

async fn authenticate(db: &MemoryDb, header: Option<&str>) -> Result<Identity, ApiError> {
    AuthenticateUseCase {
        users: db.clone(),
        jwt_secret: TEST_JWT_SECRET.into(),
    }
    .execute(header)
    .await
}

#[tokio::test]
async fn should_reject_missing_header() {
    let db = MemoryDb::default();
    let result = authenticate(&db, None).await;
    assert!(
        matches!(result, Err(ApiError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_non_bearer_scheme() {
    let db = MemoryDb::default();
    let user = db.seed_user("neo", UserRole::User);
    let token = MockAuth::user(user.id).token();

    let result = authenticate(&db, Some(&format!("Basic {token}"))).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));

    let result = authenticate(&db, Some("Bearer ")).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_accept_lowercase_scheme() {
    let db = MemoryDb::default();
    let user = db.seed_user("neo", UserRole::User);
    let token = MockAuth::user(user.id).token();

    let caller = authenticate(&db, Some(&format!("bearer {token}")))
        .await
        .unwrap();
    assert_eq!(caller.user_id, user.id);
}

#[tokio::test]
async fn should_reject_expired_token() {
    let db = MemoryDb::default();
    let user = db.seed_user("neo", UserRole::User);
    let token = MockAuth::user(user.id).expired_token();

    let result = authenticate(&db, Some(&format!("Bearer {token}"))).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let db = MemoryDb::default();
    let result = authenticate(&db, Some("Bearer not.a.jwt")).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() {
    let db = MemoryDb::default();
    let result = authenticate(&db, Some(&MockAuth::user(41).bearer())).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_take_role_from_store_not_token() {
    let db = MemoryDb::default();
    let demoted = db.seed_user("formeradmin", UserRole::User);
    let promoted = db.seed_user("newadmin", UserRole::Admin);

    let caller = authenticate(&db, Some(&MockAuth::admin(demoted.id).bearer()))
        .await
        .unwrap();
    assert_eq!(caller.role, UserRole::User);

    let caller = authenticate(&db, Some(&MockAuth::user(promoted.id).bearer()))
        .await
        .unwrap();
    assert_eq!(caller.role, UserRole::Admin);
}
