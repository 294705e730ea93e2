use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use agora_db::UserChanges;
use agora_types::api::UpdateUserRequest;
use agora_types::models::User;

use crate::auth::{hash_password, validate_email, validate_nickname, validate_password};
use crate::context::UserId;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::{AppState, blocking};

pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    fetch_user(&state, auth.user_id).await
}

pub async fn get_user(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    fetch_user(&state, user_id).await
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(req) = body?;

    // Empty strings mean "leave as is"
    let email = non_empty(req.email);
    let nickname = non_empty(req.nickname);
    let password = non_empty(req.password);

    if let Some(email) = &email {
        validate_email(email)?;
    }
    if let Some(nickname) = &nickname {
        validate_nickname(nickname)?;
    }
    let password_hash = match &password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let changes = UserChanges {
        email,
        nickname,
        password_hash,
    };
    let row = blocking(&state, move |db| db.update_user(auth.user_id, &changes)).await?;
    Ok(Json(row.into()))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    blocking(&state, move |db| db.delete_user(auth.user_id)).await?;
    info!(user_id = auth.user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_user(state: &AppState, user_id: i64) -> Result<Json<User>, ApiError> {
    let row = blocking(state, move |db| db.get_user_by_id(user_id))
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(row.into()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
