use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use moviewatch_api_schema::{movies, reviews, users, watchlist_movies, watchlists};
use moviewatch_core::sea_ext::{ContainsInsensitive as _, is_unique_violation};
use moviewatch_domain::pagination::PageRequest;

use crate::domain::repository::{
    MovieRepository, ReviewRepository, UserRepository, WatchlistRepository,
};
use crate::domain::types::{
    Movie, MovieChanges, MovieDetail, MovieFilter, MovieSummary, NewMovie, NewReview, NewUser,
    NewWatchlist, Review, ReviewChanges, ReviewDetail, ReviewFilter, User, UserChanges,
    UserSummary, Watchlist, WatchlistChanges, WatchlistMovie,
};
use crate::error::ApiError;

/// Unique-index failures become `conflict`; anything else is internal.
fn write_error(err: DbErr, conflict: ApiError, context: &'static str) -> ApiError {
    if is_unique_violation(&err) {
        conflict
    } else {
        ApiError::Internal(anyhow::Error::new(err).context(context))
    }
}

/// `RecordNotUpdated` means the row vanished between lookup and update.
fn update_error(
    err: DbErr,
    not_found: ApiError,
    conflict: ApiError,
    context: &'static str,
) -> ApiError {
    match err {
        DbErr::RecordNotUpdated => not_found,
        err => write_error(err, conflict, context),
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_conflicting(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<Option<User>, ApiError> {
        if username.is_none() && email.is_none() {
            return Ok(None);
        }
        let taken = Condition::any()
            .add_option(username.map(|u| users::Column::Username.eq(u)))
            .add_option(email.map(|e| users::Column::Email.eq(e)));
        let mut query = users::Entity::find().filter(taken);
        if let Some(id) = exclude_id {
            query = query.filter(users::Column::Id.ne(id));
        }
        let model = query
            .one(&self.db)
            .await
            .context("find conflicting user")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?
            .into_iter()
            .map(user_from_model)
            .collect()
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, ApiError::UserAlreadyExists, "create user"))?;
        user_from_model(model)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(username) = &changes.username {
            am.username = Set(username.clone());
        }
        if let Some(email) = &changes.email {
            am.email = Set(email.clone());
        }
        if let Some(password_hash) = &changes.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.map_err(|e| {
            update_error(
                e,
                ApiError::UserNotFound,
                ApiError::UserAlreadyExists,
                "update user",
            )
        })?;
        user_from_model(model)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let res = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(res.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse()
        .with_context(|| format!("user {} has unknown role", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Movie repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMovieRepository {
    pub db: DatabaseConnection,
}

impl MovieRepository for DbMovieRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, ApiError> {
        let model = movies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find movie by id")?;
        Ok(model.map(movie_from_model))
    }

    async fn find_detail(&self, id: i32) -> Result<Option<MovieDetail>, ApiError> {
        let Some(model) = movies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find movie by id")?
        else {
            return Ok(None);
        };
        let rows = reviews::Entity::find()
            .filter(reviews::Column::MovieId.eq(id))
            .find_also_related(users::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.db)
            .await
            .context("list movie reviews")?;

        let summary = MovieSummary {
            id: model.id,
            title: model.title.clone(),
        };
        let reviews = rows
            .into_iter()
            .map(|(review, author)| review_detail(review, author, Some(summary.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(MovieDetail {
            movie: movie_from_model(model),
            reviews,
        }))
    }

    async fn list(
        &self,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> Result<(Vec<Movie>, u64), ApiError> {
        let mut query = movies::Entity::find();
        if let Some(title) = &filter.title {
            query = query.filter(movies::Column::Title.contains_insensitive(title));
        }
        if let Some(director) = &filter.director {
            query = query.filter(movies::Column::Director.contains_insensitive(director));
        }
        if let Some(genre) = &filter.genre {
            query = query.filter(movies::Column::Genre.contains_insensitive(genre));
        }
        if let Some(year) = filter.release_year {
            query = query.filter(movies::Column::ReleaseYear.eq(year));
        }
        if let Some(min) = filter.min_rating {
            query = query.filter(movies::Column::AverageRating.gte(min));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count movies")?;
        let models = query
            .order_by_desc(movies::Column::CreatedAt)
            .order_by_desc(movies::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list movies")?;
        Ok((models.into_iter().map(movie_from_model).collect(), total))
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, ApiError> {
        let now = Utc::now();
        let model = movies::ActiveModel {
            title: Set(movie.title.clone()),
            director: Set(movie.director.clone()),
            genre: Set(movie.genre.clone()),
            release_year: Set(movie.release_year),
            duration: Set(movie.duration),
            description: Set(movie.description.clone()),
            average_rating: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create movie")?;
        Ok(movie_from_model(model))
    }

    async fn update(&self, id: i32, changes: &MovieChanges) -> Result<Movie, ApiError> {
        let mut am = movies::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(title) = &changes.title {
            am.title = Set(title.clone());
        }
        if let Some(director) = &changes.director {
            am.director = Set(director.clone());
        }
        if let Some(genre) = &changes.genre {
            am.genre = Set(genre.clone());
        }
        if let Some(year) = changes.release_year {
            am.release_year = Set(year);
        }
        if let Some(duration) = changes.duration {
            am.duration = Set(duration);
        }
        if let Some(description) = &changes.description {
            am.description = Set(description.clone());
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::MovieNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update movie")),
        })?;
        Ok(movie_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let res = movies::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete movie")?;
        Ok(res.rows_affected > 0)
    }

    async fn recompute_average_rating(&self, movie_id: i32) -> Result<Option<f64>, ApiError> {
        let average = reviews::Entity::find()
            .select_only()
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(reviews::Column::Rating))),
                "average",
            )
            .filter(reviews::Column::MovieId.eq(movie_id))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .context("average movie rating")?
            .flatten();

        movies::Entity::update_many()
            .col_expr(movies::Column::AverageRating, Expr::value(average))
            .filter(movies::Column::Id.eq(movie_id))
            .exec(&self.db)
            .await
            .context("store average rating")?;
        Ok(average)
    }
}

fn movie_from_model(model: movies::Model) -> Movie {
    Movie {
        id: model.id,
        title: model.title,
        director: model.director,
        genre: model.genre,
        release_year: model.release_year,
        duration: model.duration,
        description: model.description,
        average_rating: model.average_rating,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl DbReviewRepository {
    async fn movie_summaries(
        &self,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, MovieSummary>, ApiError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, String)> = movies::Entity::find()
            .select_only()
            .column(movies::Column::Id)
            .column(movies::Column::Title)
            .filter(movies::Column::Id.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await
            .context("load review movies")?;
        Ok(rows
            .into_iter()
            .map(|(id, title)| (id, MovieSummary { id, title }))
            .collect())
    }
}

impl ReviewRepository for DbReviewRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, ApiError> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(model.map(review_from_model))
    }

    async fn find_detail(&self, id: i32) -> Result<Option<ReviewDetail>, ApiError> {
        let Some((review, author)) = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review detail")?
        else {
            return Ok(None);
        };
        let mut movies = self.movie_summaries(vec![review.movie_id]).await?;
        let movie = movies.remove(&review.movie_id);
        review_detail(review, author, movie).map(Some)
    }

    async fn find_by_user_and_movie(
        &self,
        user_id: i32,
        movie_id: i32,
    ) -> Result<Option<Review>, ApiError> {
        let model = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::MovieId.eq(movie_id))
            .one(&self.db)
            .await
            .context("find review by user and movie")?;
        Ok(model.map(review_from_model))
    }

    async fn list(&self, filter: ReviewFilter) -> Result<Vec<ReviewDetail>, ApiError> {
        let mut query = reviews::Entity::find();
        if let Some(movie_id) = filter.movie_id {
            query = query.filter(reviews::Column::MovieId.eq(movie_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(reviews::Column::UserId.eq(user_id));
        }
        let rows = query
            .find_also_related(users::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.db)
            .await
            .context("list reviews")?;

        let mut movie_ids: Vec<i32> = rows.iter().map(|(r, _)| r.movie_id).collect();
        movie_ids.sort_unstable();
        movie_ids.dedup();
        let movies = self.movie_summaries(movie_ids).await?;

        rows.into_iter()
            .map(|(review, author)| {
                let movie = movies.get(&review.movie_id).cloned();
                review_detail(review, author, movie)
            })
            .collect()
    }

    async fn movie_ids_reviewed_by(&self, user_id: i32) -> Result<Vec<i32>, ApiError> {
        let ids = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::MovieId)
            .filter(reviews::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("list reviewed movie ids")?;
        Ok(ids)
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        let now = Utc::now();
        let model = reviews::ActiveModel {
            user_id: Set(review.user_id),
            movie_id: Set(review.movie_id),
            rating: Set(review.rating),
            review_description: Set(review.review_description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, ApiError::DuplicateReview, "create review"))?;
        Ok(review_from_model(model))
    }

    async fn update(&self, id: i32, changes: &ReviewChanges) -> Result<Review, ApiError> {
        let mut am = reviews::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(rating) = changes.rating {
            am.rating = Set(rating);
        }
        if let Some(description) = &changes.review_description {
            am.review_description = Set(description.clone());
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.map_err(|e| {
            update_error(
                e,
                ApiError::ReviewNotFound,
                ApiError::DuplicateReview,
                "update review",
            )
        })?;
        Ok(review_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let res = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(res.rows_affected > 0)
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        movie_id: model.movie_id,
        rating: model.rating,
        review_description: model.review_description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn review_detail(
    review: reviews::Model,
    author: Option<users::Model>,
    movie: Option<MovieSummary>,
) -> Result<ReviewDetail, ApiError> {
    let author = author.with_context(|| format!("review {} has no author", review.id))?;
    let movie = movie.with_context(|| format!("review {} has no movie", review.id))?;
    Ok(ReviewDetail {
        review: review_from_model(review),
        user: UserSummary {
            id: author.id,
            username: author.username,
        },
        movie,
    })
}

// ── Watchlist repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWatchlistRepository {
    pub db: DatabaseConnection,
}

impl WatchlistRepository for DbWatchlistRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Watchlist>, ApiError> {
        let model = watchlists::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find watchlist by id")?;
        Ok(model.map(watchlist_from_model))
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Watchlist>, ApiError> {
        let models = watchlists::Entity::find()
            .filter(watchlists::Column::UserId.eq(user_id))
            .order_by_desc(watchlists::Column::CreatedAt)
            .order_by_desc(watchlists::Column::Id)
            .all(&self.db)
            .await
            .context("list watchlists by user")?;
        Ok(models.into_iter().map(watchlist_from_model).collect())
    }

    async fn list_movies(&self, watchlist_id: i32) -> Result<Vec<MovieSummary>, ApiError> {
        let rows = watchlist_movies::Entity::find()
            .filter(watchlist_movies::Column::WatchlistId.eq(watchlist_id))
            .find_also_related(movies::Entity)
            .order_by_asc(watchlist_movies::Column::CreatedAt)
            .order_by_asc(watchlist_movies::Column::MovieId)
            .all(&self.db)
            .await
            .context("list watchlist movies")?;
        Ok(rows
            .into_iter()
            .filter_map(|(_, movie)| movie)
            .map(|m| MovieSummary {
                id: m.id,
                title: m.title,
            })
            .collect())
    }

    async fn create(&self, watchlist: &NewWatchlist) -> Result<Watchlist, ApiError> {
        let now = Utc::now();
        let model = watchlists::ActiveModel {
            user_id: Set(watchlist.user_id),
            name: Set(watchlist.name.clone()),
            description: Set(watchlist.description.clone()),
            is_public: Set(watchlist.is_public),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create watchlist")?;
        Ok(watchlist_from_model(model))
    }

    async fn update(&self, id: i32, changes: &WatchlistChanges) -> Result<Watchlist, ApiError> {
        let mut am = watchlists::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = &changes.name {
            am.name = Set(name.clone());
        }
        if let Some(description) = &changes.description {
            am.description = Set(Some(description.clone()));
        }
        if let Some(is_public) = changes.is_public {
            am.is_public = Set(is_public);
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::WatchlistNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update watchlist")),
        })?;
        Ok(watchlist_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let res = watchlists::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete watchlist")?;
        Ok(res.rows_affected > 0)
    }

    async fn find_movie(
        &self,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<Option<WatchlistMovie>, ApiError> {
        let model = watchlist_movies::Entity::find_by_id((watchlist_id, movie_id))
            .one(&self.db)
            .await
            .context("find watchlist movie")?;
        Ok(model.map(watchlist_movie_from_model))
    }

    async fn add_movie(
        &self,
        watchlist_id: i32,
        movie_id: i32,
    ) -> Result<WatchlistMovie, ApiError> {
        let model = watchlist_movies::ActiveModel {
            watchlist_id: Set(watchlist_id),
            movie_id: Set(movie_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, ApiError::MovieAlreadyInWatchlist, "add watchlist movie"))?;
        Ok(watchlist_movie_from_model(model))
    }

    async fn remove_movie(&self, watchlist_id: i32, movie_id: i32) -> Result<bool, ApiError> {
        let res = watchlist_movies::Entity::delete_by_id((watchlist_id, movie_id))
            .exec(&self.db)
            .await
            .context("remove watchlist movie")?;
        Ok(res.rows_affected > 0)
    }
}

fn watchlist_from_model(model: watchlists::Model) -> Watchlist {
    Watchlist {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        description: model.description,
        is_public: model.is_public,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn watchlist_movie_from_model(model: watchlist_movies::Model) -> WatchlistMovie {
    WatchlistMovie {
        watchlist_id: model.watchlist_id,
        movie_id: model.movie_id,
        added_at: model.created_at,
    }
}
