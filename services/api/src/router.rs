use std::any::Any;

use axum::{
    Router,
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use moviewatch_core::health::health;
use moviewatch_core::middleware::{
    REQUEST_ID_HEADER, cors_layer, propagate_request_id_layer, request_id_layer,
};

use crate::error::ApiError;
use crate::handlers::{
    index::{fallback, index},
    movie::{create_movie, delete_movie, get_movie, list_movies, update_movie},
    review::{create_review, delete_review, get_review, list_reviews, update_review},
    user::{delete_user, get_user, list_users, login, register, update_user},
    watchlist::{
        add_movie, create_watchlist, delete_watchlist, get_watchlist, list_watchlists,
        remove_movie, update_watchlist,
    },
};
use crate::middleware::auth::{
    authenticate, authenticate_optional, require_admin, require_path_owner_or_admin,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(user_routes(&state))
        .merge(movie_routes(&state))
        .merge(review_routes(&state))
        .merge(watchlist_routes(&state));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(fallback)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}

// Route layers run innermost-first: `authenticate` is added last so it wraps
// the role and ownership gates.

fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login));

    let admin = Router::new()
        .route("/users", get(list_users))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let owner = Router::new()
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(from_fn(require_path_owner_or_admin))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    public.merge(admin).merge(owner)
}

fn movie_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(get_movie));

    let admin = Router::new()
        .route("/movies", post(create_movie))
        .route("/movies/{id}", put(update_movie).delete(delete_movie))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    public.merge(admin)
}

fn review_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/reviews", get(list_reviews))
        .route("/reviews/{id}", get(get_review));

    let authed = Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    public.merge(authed)
}

fn watchlist_routes(state: &AppState) -> Router<AppState> {
    let optional = Router::new()
        .route("/watchlists/{id}", get(get_watchlist))
        .route_layer(from_fn_with_state(state.clone(), authenticate_optional));

    let authed = Router::new()
        .route("/watchlists", get(list_watchlists).post(create_watchlist))
        .route(
            "/watchlists/{id}",
            put(update_watchlist).delete(delete_watchlist),
        )
        .route("/watchlists/{id}/movies", post(add_movie))
        .route("/watchlists/{id}/movies/{movie_id}", delete(remove_movie))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    optional.merge(authed)
}

fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
