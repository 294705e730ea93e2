use axum::{Extension, Json, extract::State};

use agora_types::api::ToggleLikeResponse;
use agora_types::models::LikeTarget;

use crate::context::{CommentId, PostId};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::{AppState, blocking};

/// POST /api/posts/{post_id}/like: like if not liked yet, otherwise unlike.
pub async fn like_post(
    State(state): State<AppState>,
    PostId(post_id): PostId,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    toggle(&state, auth, LikeTarget::Post(post_id)).await
}

/// POST /api/comments/{comment_id}/like: same toggle, scoped to a comment.
pub async fn like_comment(
    State(state): State<AppState>,
    CommentId(comment_id): CommentId,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    toggle(&state, auth, LikeTarget::Comment(comment_id)).await
}

async fn toggle(
    state: &AppState,
    auth: AuthUser,
    target: LikeTarget,
) -> Result<Json<ToggleLikeResponse>, ApiError> {
    let outcome = blocking(state, move |db| db.toggle_like(auth.user_id, target)).await?;

    Ok(Json(ToggleLikeResponse {
        state: outcome.state,
        like_count: outcome.like_count,
    }))
}
