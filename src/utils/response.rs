//! The uniform response envelope.
//!
//! Every successful response is wrapped in [`Envelope`]: `{status, message,
//! data}` for single entities, plus `count`/`limit`/`page`/`total_pages`
//! for paginated lists. Error responses share the `{status, message}` shape
//! and are produced by [`crate::utils::errors::AppError`].

use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::pagination::total_pages;

#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            message: "success".to_string(),
            data,
            count: None,
            limit: None,
            page: None,
            total_pages: None,
        }
    }

    pub fn paginated(data: T, count: i64, limit: i64, page: i64) -> Self {
        Self {
            status: true,
            message: "success".to_string(),
            data,
            count: Some(count),
            limit: Some(limit),
            page: Some(page),
            total_pages: Some(total_pages(count, limit)),
        }
    }
}
