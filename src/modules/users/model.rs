//! User account models and DTOs.
//!
//! Accounts are created by an admin actor and self-served through the
//! `/account/me` endpoints. `status` and `type` are enum-like integers;
//! the well-known values live in the [`statuses`] and [`user_types`]
//! constant modules.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationParams;
use crate::utils::serde::{deserialize_optional_i64, deserialize_optional_string};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub email: String,
    pub user_name: String,
    pub citizen_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub status: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub user_type: i32,
    pub score: i32,
    pub address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a user (admin-only surface).
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "user_name is required"))]
    pub user_name: String,
    pub citizen_id: Option<String>,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    pub status: Option<i32>,
    #[serde(rename = "type")]
    pub user_type: Option<i32>,
    pub score: Option<i32>,
    pub address: Option<String>,
}

/// DTO for partial user updates, shared by the admin `/{id}` route and the
/// self-service `/me` route.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "user_name must not be empty"))]
    pub user_name: Option<String>,
    pub citizen_id: Option<String>,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    pub status: Option<i32>,
    #[serde(rename = "type")]
    pub user_type: Option<i32>,
    pub score: Option<i32>,
    pub address: Option<String>,
}

/// Query parameters for filtering users.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub citizen_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub status: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "deserialize_optional_i64")]
    pub user_type: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub lower_score: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub higher_score: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Well-known account statuses.
pub mod statuses {
    pub const INACTIVE: i32 = 0;
    pub const ACTIVE: i32 = 1;
    pub const BANNED: i32 = 2;
}

/// Well-known account types.
pub mod user_types {
    pub const CUSTOMER: i32 = 1;
    pub const ADMIN: i32 = 2;
}
