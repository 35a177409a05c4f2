//! Caller identity extractors.
//!
//! Authentication itself happens upstream: the gateway verifies the caller
//! and forwards its identity in `x-restaurant-id` / `x-user-id` headers.
//! These extractors only read and parse that identity; a request arriving
//! without it is rejected with 401 and a fixed token.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::utils::errors::AppError;

const RESTAURANT_HEADER: &str = "x-restaurant-id";
const USER_HEADER: &str = "x-user-id";

/// The restaurant on whose behalf the request is made.
#[derive(Debug, Clone, Copy)]
pub struct RestaurantContext(pub Uuid);

impl<S> FromRequestParts<S> for RestaurantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_id(parts, RESTAURANT_HEADER, "restaurant_context_missing")
            .map(RestaurantContext)
    }
}

/// The account the request acts on behalf of (`/account/me`).
#[derive(Debug, Clone, Copy)]
pub struct UserContext(pub Uuid);

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_id(parts, USER_HEADER, "user_context_missing").map(UserContext)
    }
}

fn extract_id(parts: &Parts, header: &str, token: &'static str) -> Result<Uuid, AppError> {
    parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uuid>().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!(token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(name: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri("/")
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    fn bare_parts() -> Parts {
        let (parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extracts_valid_uuid() {
        let id = Uuid::new_v4();
        let parts = parts_with_header(RESTAURANT_HEADER, &id.to_string());
        let extracted =
            extract_id(&parts, RESTAURANT_HEADER, "restaurant_context_missing").unwrap();
        assert_eq!(extracted, id);
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = bare_parts();
        let err = extract_id(&parts, USER_HEADER, "user_context_missing").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "user_context_missing");
    }

    #[test]
    fn test_malformed_uuid_is_unauthorized() {
        let parts = parts_with_header(USER_HEADER, "not-a-uuid");
        let err = extract_id(&parts, USER_HEADER, "user_context_missing").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
