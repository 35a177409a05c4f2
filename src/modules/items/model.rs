//! Menu item models and DTOs.
//!
//! An item always belongs to a restaurant; the owning `restaurant_id` is
//! taken from the caller's context, never from the request body. Prices
//! are integer minor units.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationParams;
use crate::utils::serde::{deserialize_optional_string, deserialize_optional_uuid};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: i64,
    pub avatar: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateItemDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    pub avatar: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    pub avatar: Option<String>,
}

/// Query parameters for filtering items.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ItemFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub restaurant_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}
