use moviewatch_api::domain::types::{Identity, Watchlist, WatchlistChanges};
use moviewatch_api::error::ApiError;
use moviewatch_api::usecase::watchlist::{
    AddWatchlistMovieUseCase, CreateWatchlistInput, CreateWatchlistUseCase,
    DeleteWatchlistUseCase, GetWatchlistUseCase, ListWatchlistsUseCase,
    RemoveWatchlistMovieUseCase, UpdateWatchlistUseCase,
};
use moviewatch_domain::user::UserRole;

use crate::helpers::{MemoryDb, StalePreChecks, identity};

async fn create(db: &MemoryDb, owner: &Identity, name: &str, is_public: bool) -> Watchlist {
    CreateWatchlistUseCase {
        watchlists: db.clone(),
    }
    .execute(
        owner,
        CreateWatchlistInput {
            name: name.into(),
            description: Some("for later".into()),
            is_public,
        },
    )
    .await
    .unwrap()
}

fn add(db: &MemoryDb) -> AddWatchlistMovieUseCase<MemoryDb, MemoryDb> {
    AddWatchlistMovieUseCase {
        watchlists: db.clone(),
        movies: db.clone(),
    }
}

fn get(db: &MemoryDb) -> GetWatchlistUseCase<MemoryDb> {
    GetWatchlistUseCase {
        watchlists: db.clone(),
    }
}

// ── Visibility ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_show_private_watchlist_only_to_owner() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let other = identity(&db.seed_user("other", UserRole::User));
    let admin = identity(&db.seed_user("root", UserRole::Admin));
    let private = create(&db, &owner, "Secret", false).await;

    assert!(get(&db).execute(Some(&owner), private.id).await.is_ok());
    assert!(matches!(
        get(&db).execute(Some(&other), private.id).await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        get(&db).execute(Some(&admin), private.id).await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        get(&db).execute(None, private.id).await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn should_show_public_watchlist_to_anyone_with_movies() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let movie = db.seed_movie("Paprika");
    let public = create(&db, &owner, "Anime", true).await;
    add(&db).execute(&owner, public.id, movie.id).await.unwrap();

    let detail = get(&db).execute(None, public.id).await.unwrap();

    assert_eq!(detail.watchlist.name, "Anime");
    assert_eq!(detail.movies.len(), 1);
    assert_eq!(detail.movies[0].title, "Paprika");
}

#[tokio::test]
async fn should_list_only_callers_watchlists() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));
    let bob = identity(&db.seed_user("bob", UserRole::User));
    create(&db, &alice, "Mine", false).await;
    create(&db, &alice, "Also mine", true).await;
    create(&db, &bob, "Bob's", true).await;

    let lists = ListWatchlistsUseCase {
        watchlists: db.clone(),
    }
    .execute(&alice)
    .await
    .unwrap();

    assert_eq!(lists.len(), 2);
    assert!(lists.iter().all(|w| w.user_id == alice.user_id));
}

#[tokio::test]
async fn should_return_watchlist_not_found() {
    let db = MemoryDb::default();
    let alice = identity(&db.seed_user("alice", UserRole::User));

    assert!(matches!(
        get(&db).execute(Some(&alice), 42).await,
        Err(ApiError::WatchlistNotFound)
    ));
}

// ── Membership ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_duplicate_movie() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let movie = db.seed_movie("Stalker");
    let list = create(&db, &owner, "Tarkovsky", false).await;

    let entry = add(&db).execute(&owner, list.id, movie.id).await.unwrap();
    assert_eq!(entry.watchlist_id, list.id);
    assert_eq!(entry.movie_id, movie.id);

    let again = add(&db).execute(&owner, list.id, movie.id).await;
    assert!(matches!(again, Err(ApiError::MovieAlreadyInWatchlist)));
    assert_eq!(db.entry_count(), 1);
}

#[tokio::test]
async fn should_reject_racing_duplicate_movie_at_insert() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let movie = db.seed_movie("Ran");
    let list = create(&db, &owner, "Kurosawa", false).await;
    add(&db).execute(&owner, list.id, movie.id).await.unwrap();

    let result = AddWatchlistMovieUseCase {
        watchlists: StalePreChecks(db.clone()),
        movies: db.clone(),
    }
    .execute(&owner, list.id, movie.id)
    .await;

    assert!(matches!(result, Err(ApiError::MovieAlreadyInWatchlist)));
    assert_eq!(db.entry_count(), 1);
}

#[tokio::test]
async fn should_reject_unknown_movie() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let list = create(&db, &owner, "Empty", false).await;

    let result = add(&db).execute(&owner, list.id, 999).await;
    assert!(matches!(result, Err(ApiError::MovieNotFound)));
}

#[tokio::test]
async fn should_only_let_owner_add_movies() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let admin = identity(&db.seed_user("root", UserRole::Admin));
    let movie = db.seed_movie("Solaris");
    let list = create(&db, &owner, "Mine", true).await;

    let result = add(&db).execute(&admin, list.id, movie.id).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_remove_movie_and_report_missing_membership() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let other = identity(&db.seed_user("other", UserRole::User));
    let movie = db.seed_movie("Mirror");
    let list = create(&db, &owner, "Mine", false).await;
    add(&db).execute(&owner, list.id, movie.id).await.unwrap();

    let remove = RemoveWatchlistMovieUseCase {
        watchlists: db.clone(),
    };
    assert!(matches!(
        remove.execute(&other, list.id, movie.id).await,
        Err(ApiError::Forbidden)
    ));
    remove.execute(&owner, list.id, movie.id).await.unwrap();
    assert_eq!(db.entry_count(), 0);

    assert!(matches!(
        remove.execute(&owner, list.id, movie.id).await,
        Err(ApiError::WatchlistMovieNotFound)
    ));
}

// ── Update / Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_partial_update_for_owner_only() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let admin = identity(&db.seed_user("root", UserRole::Admin));
    let list = create(&db, &owner, "Draft", false).await;
    let usecase = UpdateWatchlistUseCase {
        watchlists: db.clone(),
    };

    let updated = usecase
        .execute(
            &owner,
            list.id,
            WatchlistChanges {
                is_public: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_public);
    assert_eq!(updated.name, "Draft");
    assert_eq!(updated.description.as_deref(), Some("for later"));

    let result = usecase
        .execute(
            &admin,
            list.id,
            WatchlistChanges {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_let_owner_or_admin_delete() {
    let db = MemoryDb::default();
    let owner = identity(&db.seed_user("owner", UserRole::User));
    let other = identity(&db.seed_user("other", UserRole::User));
    let admin = identity(&db.seed_user("root", UserRole::Admin));
    let first = create(&db, &owner, "One", false).await;
    let second = create(&db, &owner, "Two", false).await;
    let usecase = DeleteWatchlistUseCase {
        watchlists: db.clone(),
    };

    assert!(matches!(
        usecase.execute(&other, first.id).await,
        Err(ApiError::Forbidden)
    ));
    usecase.execute(&owner, first.id).await.unwrap();
    usecase.execute(&admin, second.id).await.unwrap();
    assert_eq!(db.watchlist_count(), 0);

    assert!(matches!(
        usecase.execute(&owner, first.id).await,
        Err(ApiError::WatchlistNotFound)
    ));
}
