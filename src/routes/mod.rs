use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod reviews;
pub mod titles;
pub mod watchlist;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(list_routes())
        .route("/titles/:id", get(titles::get_title))
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/:title_id", get(reviews::list_reviews))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/account", put(auth::update_account))
        .route("/account/update", put(auth::update_account))
}

/// Watchlist lifecycle: `:title_id` is the local title id, scoped to the session user.
/// Rating and review are also reachable from the seen and favorites lists; the
/// SEEN rule for ratings applies on every path.
fn list_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/watchlist",
            get(watchlist::get_watchlist).post(watchlist::add_to_watchlist),
        )
        .route("/watchlist/:title_id/seen", put(watchlist::mark_seen))
        .route("/watchlist/:title_id/junk", put(watchlist::move_to_junk))
        .route("/watchlist/:title_id/favorite", put(watchlist::set_favorite))
        .route("/watchlist/:title_id/rating", put(watchlist::rate))
        .route("/watchlist/:title_id/review", put(watchlist::review))
        .route("/seen", get(watchlist::get_seen))
        .route("/seen/:title_id/remove", put(watchlist::unmark_seen))
        .route("/seen/:title_id/rating", put(watchlist::rate))
        .route("/seen/:title_id/review", put(watchlist::review))
        .route("/favorites", get(watchlist::get_favorites))
        .route("/favorites/:title_id/remove", put(watchlist::unfavorite))
        .route("/favorites/:title_id/rating", put(watchlist::rate))
        .route("/favorites/:title_id/review", put(watchlist::review))
        .route("/junk", get(watchlist::get_junk))
        .route("/junk/:title_id/restore", put(watchlist::restore))
}

/// Credentialed CORS for the single configured frontend origin
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                origin = %origin,
                error = %e,
                "Invalid CORS origin, cross-origin requests disabled"
            );
            layer
        }
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
