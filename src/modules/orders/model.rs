//! Order line-entry model.
//!
//! An [`OrderItem`] is a line inside an order aggregate that lives outside
//! this service; it has no table or routes of its own here. It references
//! a menu item (and optionally one of its options) with a quantity that
//! defaults to zero and can never be negative.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct OrderItem {
    pub item_id: Uuid,
    pub item_option: Option<Uuid>,
    #[serde(default)]
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
}
