//! Request pagination utilities.
//!
//! Query-string pagination arrives as strings, so the fields deserialize
//! through the coercion helpers in [`crate::utils::serde`]: an absent or
//! unparsable value is simply absent, it never rejects the request.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::utils::serde::{deserialize_optional_i64, deserialize_optional_string};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort_order: Option<String>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(10),
            sort_by: None,
            sort_order: None,
        }
    }
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Zero is a valid limit: the query returns no rows and the envelope
    /// reports zero pages.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).max(0)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    pub fn sort_order(&self) -> &'static str {
        match self.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        }
    }
}

/// Ceiling division, guarded so a zero limit yields zero instead of
/// dividing by zero.
pub fn total_pages(count: i64, limit: i64) -> i64 {
    if limit > 0 { (count + limit - 1) / limit } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.sort_order(), "DESC");
    }

    #[test]
    fn test_offset_from_page_and_limit() {
        let params = PaginationParams {
            page: Some(2),
            limit: Some(10),
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn test_page_floors_at_one() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(10),
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams {
            page: Some(-3),
            limit: Some(10),
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_zero_limit_is_representable() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(0),
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(params.limit(), 0);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_negative_limit_floors_at_zero() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(-5),
            sort_by: None,
            sort_order: None,
        };
        assert_eq!(params.limit(), 0);
    }

    #[test]
    fn test_sort_order_coercion() {
        let mut params = PaginationParams::default();
        assert_eq!(params.sort_order(), "DESC");

        params.sort_order = Some("asc".to_string());
        assert_eq!(params.sort_order(), "ASC");

        params.sort_order = Some("ASC".to_string());
        assert_eq!(params.sort_order(), "ASC");

        params.sort_order = Some("sideways".to_string());
        assert_eq!(params.sort_order(), "DESC");
    }

    #[test]
    fn test_total_pages_exact_and_partial() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_total_pages_zero_limit_does_not_divide() {
        assert_eq!(total_pages(25, 0), 0);
        assert_eq!(total_pages(0, 0), 0);
    }

    #[test]
    fn test_deserialize_from_strings() {
        let json = r#"{"page":"2","limit":"25","sort_by":"name","sort_order":"asc"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.limit(), 25);
        assert_eq!(params.sort_by.as_deref(), Some("name"));
        assert_eq!(params.sort_order(), "ASC");
    }

    #[test]
    fn test_deserialize_garbage_falls_back() {
        let json = r#"{"page":"two","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }
}
