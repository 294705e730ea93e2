pub mod auth;
pub mod comments;
pub mod context;
pub mod error;
pub mod likes;
pub mod middleware;
pub mod posts;
pub mod state;
pub mod token;
pub mod users;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};
pub use token::TokenKeys;

/// All routes. Everything except registration, login and health sits behind
/// the bearer-token middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/users", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/user",
            get(users::get_me).put(users::update_me).delete(users::delete_me),
        )
        .route("/api/users/{user_id}", get(users::get_user))
        .route("/api/posts", post(posts::create_post))
        .route(
            "/api/posts/{post_id}",
            get(posts::get_post).put(posts::update_post).delete(posts::delete_post),
        )
        .route("/api/posts/{post_id}/like", post(likes::like_post))
        .route(
            "/api/posts/{post_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/comments/{comment_id}/like", post(likes::like_comment))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health, liveness check (no auth).
pub async fn health() -> &'static str {
    "ok"
}
