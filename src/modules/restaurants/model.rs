//! Restaurant data models and DTOs.
//!
//! A restaurant is created with a system-generated unique code and a
//! system-generated random password; the password is stored bcrypt-hashed
//! and never serialized back out. Restaurants are soft-deleted: reads and
//! the phone-uniqueness rule only consider live rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationParams;
use crate::utils::serde::{deserialize_optional_i64, deserialize_optional_string};

/// Prefix every generated restaurant code starts with.
pub const RESTAURANT_CODE_PREFIX: &str = "RES";
/// Number of random digits following the prefix.
pub const RESTAURANT_CODE_DIGITS: usize = 8;
/// Length of the generated initial password.
pub const RESTAURANT_PASSWORD_LEN: usize = 8;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub lower_score: i32,
    pub higher_score: i32,
    pub avatar: Option<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a restaurant.
///
/// `code` and `password` are system-generated, not accepted from the
/// caller; unknown fields are rejected at the boundary.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateRestaurantDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub lower_score: Option<i32>,
    pub higher_score: Option<i32>,
    pub avatar: Option<String>,
}

/// DTO for partial restaurant updates. Absent fields keep their stored
/// values; a present `password` is re-hashed before persisting.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateRestaurantDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub lower_score: Option<i32>,
    pub higher_score: Option<i32>,
    pub avatar: Option<String>,
}

/// Query parameters for filtering restaurants. A field is present only if
/// the raw value survives coercion; empty strings and unparsable integers
/// are absent, never defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RestaurantFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub lower_score: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub higher_score: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_omits_empty_keeps_present() {
        let json = r#"{"code":"","name":"A"}"#;
        let filter: RestaurantFilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(filter.code, None);
        assert_eq!(filter.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_filter_scores_coerce_independently() {
        let json = r#"{"lower_score":"3","higher_score":"7"}"#;
        let filter: RestaurantFilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(filter.lower_score, Some(3));
        assert_eq!(filter.higher_score, Some(7));

        let json = r#"{"lower_score":"three"}"#;
        let filter: RestaurantFilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(filter.lower_score, None);
    }

    #[test]
    fn test_filter_flattens_pagination() {
        let json = r#"{"name":"Pho","page":"2","limit":"5"}"#;
        let filter: RestaurantFilterParams = serde_json::from_str(json).unwrap();
        assert_eq!(filter.pagination.page(), 2);
        assert_eq!(filter.pagination.limit(), 5);
        assert_eq!(filter.pagination.offset(), 5);
    }

    #[test]
    fn test_create_dto_rejects_unknown_fields() {
        let json = r#"{"name":"Pho 24","phone":"0900000001","code":"RES1"}"#;
        let result: Result<CreateRestaurantDto, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_dto_validation() {
        use validator::Validate;

        let dto = CreateRestaurantDto {
            name: "Pho 24".to_string(),
            phone: "0900000001".to_string(),
            address: None,
            city: None,
            district: None,
            lower_score: None,
            higher_score: None,
            avatar: None,
        };
        assert!(dto.validate().is_ok());

        let dto = CreateRestaurantDto {
            name: "".to_string(),
            ..dto
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_password_is_never_serialized() {
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            code: "RES12345678".to_string(),
            name: "Pho 24".to_string(),
            phone: "0900000001".to_string(),
            password: "$2b$12$secret".to_string(),
            address: None,
            city: None,
            district: None,
            lower_score: 0,
            higher_score: 0,
            avatar: None,
            deleted_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&restaurant).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["code"], "RES12345678");
    }
}
