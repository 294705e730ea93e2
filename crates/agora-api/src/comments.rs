use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use agora_types::api::{CreateCommentRequest, UpdateContentRequest};
use agora_types::models::Comment;

use crate::context::{CommentId, PostId};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::posts::require_content;
use crate::state::{AppState, blocking};

pub async fn create_comment(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let content = require_content(req.content, "comment")?;

    let row = blocking(&state, move |db| db.create_comment(auth.user_id, post_id, &content)).await?;
    info!(comment_id = row.id, post_id, author_id = auth.user_id, "comment created");

    Ok((StatusCode::CREATED, Json(Comment::from(row))))
}

pub async fn list_comments(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let rows = blocking(&state, move |db| db.list_comments(post_id)).await?;
    Ok(Json(rows.into_iter().map(Comment::from).collect()))
}

pub async fn get_comment(
    State(state): State<AppState>,
    CommentId(comment_id): CommentId,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Comment>, ApiError> {
    let row = blocking(&state, move |db| db.get_comment(comment_id))
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    Ok(Json(row.into()))
}

pub async fn update_comment(
    State(state): State<AppState>,
    CommentId(comment_id): CommentId,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<UpdateContentRequest>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let Json(req) = body?;
    let content = require_content(req.content, "comment")?;

    let row =
        blocking(&state, move |db| db.update_comment(auth.user_id, comment_id, &content)).await?;
    Ok(Json(row.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    CommentId(comment_id): CommentId,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Comment>, ApiError> {
    let row = blocking(&state, move |db| db.delete_comment(auth.user_id, comment_id)).await?;
    info!(comment_id, author_id = auth.user_id, "comment deleted");
    Ok(Json(row.into()))
}
