use moviewatch_api::domain::types::{MovieChanges, MovieFilter, NewMovie};
use moviewatch_api::error::ApiError;
use moviewatch_api::usecase::movie::{
    CreateMovieUseCase, DeleteMovieUseCase, GetMovieUseCase, ListMoviesUseCase,
    UpdateMovieUseCase,
};
use moviewatch_api::usecase::review::{CreateReviewInput, CreateReviewUseCase};
use moviewatch_api::usecase::watchlist::{
    AddWatchlistMovieUseCase, CreateWatchlistInput, CreateWatchlistUseCase,
};
use moviewatch_domain::pagination::PageRequest;
use moviewatch_domain::user::UserRole;

use crate::helpers::{MemoryDb, identity};

fn list(db: &MemoryDb) -> ListMoviesUseCase<MemoryDb> {
    ListMoviesUseCase { movies: db.clone() }
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_paginate_newest_first() {
    let db = MemoryDb::default();
    let first = db.seed_movie("First");
    let second = db.seed_movie("Second");
    let third = db.seed_movie("Third");

    let page = list(&db)
        .execute(MovieFilter::default(), PageRequest::new(Some(2), Some(1)))
        .await
        .unwrap();

    assert_eq!(page.movies.len(), 1);
    assert_eq!(page.movies[0].id, second.id);
    assert_eq!(page.page.page, 2);
    assert_eq!(page.page.limit, 1);
    assert_eq!(page.page.total, 3);
    assert_eq!(page.page.pages, 3);

    let page = list(&db)
        .execute(MovieFilter::default(), PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<i32> = page.movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
    assert_eq!(page.page.pages, 1);
}

#[tokio::test]
async fn should_return_empty_page_past_the_end() {
    let db = MemoryDb::default();
    db.seed_movie("Only");

    let page = list(&db)
        .execute(MovieFilter::default(), PageRequest::new(Some(5), Some(10)))
        .await
        .unwrap();

    assert!(page.movies.is_empty());
    assert_eq!(page.page.total, 1);
    assert_eq!(page.page.pages, 1);
}

#[tokio::test]
async fn should_filter_by_title_case_insensitively() {
    let db = MemoryDb::default();
    db.seed_movie("The Matrix");
    db.seed_movie("The Matrix Reloaded");
    db.seed_movie("Heat");

    let page = list(&db)
        .execute(
            MovieFilter {
                title: Some("MATRIX".into()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.page.total, 2);
    assert!(page.movies.iter().all(|m| m.title.contains("Matrix")));
}

#[tokio::test]
async fn should_exclude_unrated_movies_from_min_rating_filter() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let rated = db.seed_movie("Rated");
    db.seed_movie("Unrated");
    CreateReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(
        &alice,
        CreateReviewInput {
            movie_id: rated.id,
            rating: 8.0,
            review_description: "solid".into(),
        },
    )
    .await
    .unwrap();

    let page = list(&db)
        .execute(
            MovieFilter {
                min_rating: Some(7.5),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.movies.len(), 1);
    assert_eq!(page.movies[0].id, rated.id);
}

// ── Get / Create / Update ────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_movie_with_reviews() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let movie = db.seed_movie("Arrival");
    CreateReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(
        &alice,
        CreateReviewInput {
            movie_id: movie.id,
            rating: 9.0,
            review_description: "language".into(),
        },
    )
    .await
    .unwrap();

    let detail = GetMovieUseCase { movies: db.clone() }
        .execute(movie.id)
        .await
        .unwrap();

    assert_eq!(detail.movie.average_rating, Some(9.0));
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.reviews[0].user.username, "alice");
}

#[tokio::test]
async fn should_create_movie_without_average() {
    let db = MemoryDb::default();

    let movie = CreateMovieUseCase { movies: db.clone() }
        .execute(NewMovie {
            title: "Dune".into(),
            director: "Denis Villeneuve".into(),
            genre: "Sci-Fi".into(),
            release_year: 2021,
            duration: 155,
            description: "Spice.".into(),
        })
        .await
        .unwrap();

    assert_eq!(movie.title, "Dune");
    assert_eq!(movie.average_rating, None);
}

#[tokio::test]
async fn should_update_only_given_fields() {
    let db = MemoryDb::default();
    let movie = db.seed_movie("Blade Runner");

    let updated = UpdateMovieUseCase { movies: db.clone() }
        .execute(
            movie.id,
            MovieChanges {
                duration: Some(117),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.duration, 117);
    assert_eq!(updated.title, "Blade Runner");
}

#[tokio::test]
async fn should_return_movie_not_found() {
    let db = MemoryDb::default();

    assert!(matches!(
        GetMovieUseCase { movies: db.clone() }.execute(1).await,
        Err(ApiError::MovieNotFound)
    ));
    assert!(matches!(
        UpdateMovieUseCase { movies: db.clone() }
            .execute(1, MovieChanges::default())
            .await,
        Err(ApiError::MovieNotFound)
    ));
    assert!(matches!(
        DeleteMovieUseCase { movies: db.clone() }.execute(1).await,
        Err(ApiError::MovieNotFound)
    ));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cascade_delete_to_reviews_and_watchlist_entries() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let movie = db.seed_movie("Memento");
    CreateReviewUseCase {
        movies: db.clone(),
        reviews: db.clone(),
    }
    .execute(
        &alice,
        CreateReviewInput {
            movie_id: movie.id,
            rating: 8.5,
            review_description: "backwards".into(),
        },
    )
    .await
    .unwrap();
    let watchlist = CreateWatchlistUseCase {
        watchlists: db.clone(),
    }
    .execute(
        &alice,
        CreateWatchlistInput {
            name: "Nolan".into(),
            description: None,
            is_public: false,
        },
    )
    .await
    .unwrap();
    AddWatchlistMovieUseCase {
        watchlists: db.clone(),
        movies: db.clone(),
    }
    .execute(&alice, watchlist.id, movie.id)
    .await
    .unwrap();

    DeleteMovieUseCase { movies: db.clone() }
        .execute(movie.id)
        .await
        .unwrap();

    assert_eq!(db.review_count(), 0);
    assert_eq!(db.entry_count(), 0);
    assert_eq!(db.watchlist_count(), 1);
}
