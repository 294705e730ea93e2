use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::SaltString,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rand_core::OsRng;
use tracing::info;

use agora_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;
use crate::state::{AppState, blocking};

const MAX_NICKNAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    validate_nickname(&req.nickname)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;

    let row = blocking(&state, move |db| {
        db.create_user(&req.nickname, &req.email, &password_hash)
    })
    .await?;

    let token = state.tokens.issue(row.id)?;
    info!(user_id = row.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: row.into(),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;

    let email = req.email.clone();
    let user = blocking(&state, move |db| db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::AuthInvalid)?;

    verify_password(&req.password, &user.password_hash)?;

    let token = state.tokens.issue(user.id)?;
    Ok(Json(LoginResponse {
        user_id: user.id,
        token,
    }))
}

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, stored_hash: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("corrupt password hash: {}", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::AuthInvalid)
}

pub(crate) fn validate_nickname(nickname: &str) -> Result<(), ApiError> {
    if nickname.trim().is_empty() || nickname.chars().count() > MAX_NICKNAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "nickname must be 1 to {MAX_NICKNAME_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed || email.len() > MAX_EMAIL_LEN {
        return Err(ApiError::BadRequest("invalid email".into()));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_the_right_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        verify_password("correct horse", &hash).unwrap();
        assert!(matches!(verify_password("wrong horse", &hash), Err(ApiError::AuthInvalid)));
    }

    #[test]
    fn registration_fields_are_checked() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("nobody").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname(&"x".repeat(51)).is_err());
        assert!(validate_password("short").is_err());
    }
}
