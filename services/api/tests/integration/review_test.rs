use moviewatch_api::domain::types::{Identity, Review, ReviewChanges, ReviewFilter};
use moviewatch_api::error::ApiError;
use moviewatch_api::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, UpdateReviewUseCase,
};
use moviewatch_domain::user::UserRole;

use crate::helpers::{MemoryDb, StalePreChecks, assert_close, identity};

async fn review(
    db: &MemoryDb,
    author: &Identity,
    movie_id: i32,
    rating: f64,
) -> Result<Review, ApiError> {
    CreateReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(
        author,
        CreateReviewInput {
            movie_id,
            rating,
            review_description: "worth a watch".into(),
        },
    )
    .await
}

async fn rerate(
    db: &MemoryDb,
    caller: &Identity,
    review_id: i32,
    rating: f64,
) -> Result<Review, ApiError> {
    UpdateReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(
        caller,
        review_id,
        ReviewChanges {
            rating: Some(rating),
            ..Default::default()
        },
    )
    .await
}

async fn remove(db: &MemoryDb, caller: &Identity, review_id: i32) -> Result<(), ApiError> {
    DeleteReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(caller, review_id)
    .await
}

// ── Average rating ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_recompute_average_after_create_and_delete() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let bob = identity(&db.seed_user("bob", UserRole::User));
    let movie = db.seed_movie("The Matrix");

    review(&db, &alice, movie.id, 10.0).await.unwrap();
    assert_close(db.average(movie.id), 10.0);

    let second = review(&db, &bob, movie.id, 9.7).await.unwrap();
    assert_close(db.average(movie.id), 9.85);

    remove(&db, &bob, second.id).await.unwrap();
    assert_close(db.average(movie.id), 10.0);
}

#[tokio::test]
async fn should_recompute_average_after_update() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let bob = identity(&db.seed_user("bob", UserRole::User));
    let movie = db.seed_movie("Heat");

    let first = review(&db, &alice, movie.id, 6.0).await.unwrap();
    review(&db, &bob, movie.id, 8.0).await.unwrap();
    assert_close(db.average(movie.id), 7.0);

    rerate(&db, &alice, first.id, 10.0).await.unwrap();
    assert_close(db.average(movie.id), 9.0);
}

#[tokio::test]
async fn should_clear_average_when_last_review_is_deleted() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let movie = db.seed_movie("Alien");

    let only = review(&db, &alice, movie.id, 8.0).await.unwrap();
    remove(&db, &alice, only.id).await.unwrap();

    assert_eq!(db.average(movie.id), None);
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_second_review_for_same_movie() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let movie = db.seed_movie("Se7en");

    review(&db, &alice, movie.id, 9.0).await.unwrap();
    let result = review(&db, &alice, movie.id, 2.0).await;

    assert!(
        matches!(result, Err(ApiError::DuplicateReview)),
        "expected DuplicateReview, got {result:?}"
    );
    assert_eq!(db.review_count(), 1);
    assert_close(db.average(movie.id), 9.0);
}

#[tokio::test]
async fn should_return_movie_not_found_for_unknown_movie() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));

    let result = review(&db, &alice, 404, 5.0).await;

    assert!(matches!(result, Err(ApiError::MovieNotFound)));
    assert_eq!(db.review_count(), 0);
}

// ── Ownership ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_editing_someone_elses_review() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let mallory = identity(&db.seed_user("mallory", UserRole::User));
    let movie = db.seed_movie("Fargo");
    let original = review(&db, &alice, movie.id, 8.0).await.unwrap();

    let result = rerate(&db, &mallory, original.id, 1.0).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));

    let result = remove(&db, &mallory, original.id).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));

    let stored = GetReviewUseCase { reviews: db.clone() }
        .execute(original.id)
        .await
        .unwrap();
    assert_eq!(stored.review.rating, 8.0);
    assert_close(db.average(movie.id), 8.0);
}

#[tokio::test]
async fn should_let_admin_edit_and_delete_any_review() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let admin = identity(&db.seed_user("root", UserRole::Admin));
    let movie = db.seed_movie("Ran");
    let original = review(&db, &alice, movie.id, 3.0).await.unwrap();

    let updated = rerate(&db, &admin, original.id, 7.5).await.unwrap();
    assert_eq!(updated.rating, 7.5);
    assert_close(db.average(movie.id), 7.5);

    remove(&db, &admin, original.id).await.unwrap();
    assert_eq!(db.review_count(), 0);
}

#[tokio::test]
async fn should_return_review_not_found() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));

    assert!(matches!(
        rerate(&db, &alice, 99, 5.0).await,
        Err(ApiError::ReviewNotFound)
    ));
    assert!(matches!(
        remove(&db, &alice, 99).await,
        Err(ApiError::ReviewNotFound)
    ));
    assert!(matches!(
        GetReviewUseCase { reviews: db.clone() }.execute(99).await,
        Err(ApiError::ReviewNotFound)
    ));
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_filter_reviews_and_annotate_author_and_movie() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let bob = identity(&db.seed_user("bob", UserRole::User));
    let matrix = db.seed_movie("The Matrix");
    let heat = db.seed_movie("Heat");
    review(&db, &alice, matrix.id, 9.0).await.unwrap();
    review(&db, &bob, matrix.id, 7.0).await.unwrap();
    review(&db, &alice, heat.id, 8.0).await.unwrap();

    let usecase = ListReviewsUseCase { reviews: db.clone() };

    let for_matrix = usecase
        .execute(ReviewFilter {
            movie_id: Some(matrix.id),
            user_id: None,
        })
        .await
        .unwrap();
    assert_eq!(for_matrix.len(), 2);
    assert!(for_matrix.iter().all(|r| r.movie.title == "The Matrix"));

    let by_alice = usecase
        .execute(ReviewFilter {
            movie_id: None,
            user_id: Some(alice.user_id),
        })
        .await
        .unwrap();
    assert_eq!(by_alice.len(), 2);
    assert!(by_alice.iter().all(|r| r.user.username == "alice"));

    let all = usecase.execute(ReviewFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn should_reject_racing_duplicate_at_insert_without_recompute() {
    let db = MemoryDb::default();
    let author = identity(&db.seed_user("neo", UserRole::User));
    let movie = db.seed_movie("Dark City");
    review(&db, &author, movie.id, 8.0).await.unwrap();
    let recomputes = db.recompute_count();

    let result = CreateReviewUseCase {
        movies: db.clone(),
        reviews: StalePreChecks(db.clone()),
    }
    .execute(
        &author,
        CreateReviewInput {
            movie_id: movie.id,
            rating: 2.0,
            review_description: "second opinion".into(),
        },
    )
    .await;

    assert!(
        matches!(result, Err(ApiError::DuplicateReview)),
        "expected DuplicateReview, got {result:?}"
    );
    assert_eq!(db.review_count(), 1);
    assert_eq!(db.recompute_count(), recomputes);
    assert_close(db.average(movie.id), 8.0);
}
