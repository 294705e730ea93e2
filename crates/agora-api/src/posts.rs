use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use agora_types::api::{CreatePostRequest, UpdateContentRequest};
use agora_types::models::Post;

use crate::context::PostId;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::{AppState, blocking};

pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let content = require_content(req.content, "post")?;

    let row = blocking(&state, move |db| db.create_post(auth.user_id, &content)).await?;
    info!(post_id = row.id, author_id = auth.user_id, "post created");

    Ok((StatusCode::CREATED, Json(Post::from(row))))
}

pub async fn get_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Post>, ApiError> {
    let row = blocking(&state, move |db| db.get_post(post_id))
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    Ok(Json(row.into()))
}

/// Only the author may edit; everyone else gets 403.
pub async fn update_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<UpdateContentRequest>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(req) = body?;
    let content = require_content(req.content, "post")?;

    let row = blocking(&state, move |db| db.update_post(auth.user_id, post_id, &content)).await?;
    Ok(Json(row.into()))
}

/// Removes the post together with its comments and all likes on either.
pub async fn delete_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Post>, ApiError> {
    let row = blocking(&state, move |db| db.delete_post(auth.user_id, post_id)).await?;
    info!(post_id, author_id = auth.user_id, "post deleted");
    Ok(Json(row.into()))
}

pub(crate) fn require_content(content: String, kind: &str) -> Result<String, ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{kind} content can't be empty")));
    }
    Ok(content)
}
