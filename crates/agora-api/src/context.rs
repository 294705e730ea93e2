//! Resource ids taken from the request path.
//!
//! These extractors only check the *shape* of an id. Whether the row exists
//! is for the store call downstream to decide.

use axum::{
    extract::{FromRequestParts, RawPathParams},
    http::request::Parts,
};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Parse a path segment into a positive row id.
pub fn parse_resource_id(raw: Option<&str>, param: &str) -> Result<i64, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest(format!("{param} is required")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("invalid {param}: {raw:?}"))),
    }
}

async fn path_id<S>(parts: &mut Parts, state: &S, param: &str) -> Result<i64, ApiError>
where
    S: Send + Sync,
{
    let params = RawPathParams::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::BadRequest(format!("{param} is required")))?;
    let raw = params.iter().find(|(name, _)| *name == param).map(|(_, value)| value);
    parse_resource_id(raw, param)
}

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "post_id").await.map(Self)
    }
}

impl<S> FromRequestParts<S> for CommentId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "comment_id").await.map(Self)
    }
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        path_id(parts, state, "user_id").await.map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_segment_parses() {
        assert_eq!(parse_resource_id(Some("17"), "post_id").unwrap(), 17);
    }

    #[test]
    fn absent_segment_is_bad_request() {
        let err = parse_resource_id(None, "post_id").unwrap_err();
        assert_eq!(err.to_string(), "post_id is required");
    }

    #[test]
    fn malformed_segments_are_bad_request() {
        for raw in ["", "abc", "12abc", "1.5", "0", "-3", "99999999999999999999"] {
            let err = parse_resource_id(Some(raw), "comment_id").unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{raw:?} was accepted");
        }
    }
}
