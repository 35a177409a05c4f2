use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use uuid::Uuid;

use crate::middleware::context::RestaurantContext;
use crate::modules::items::model::{CreateItemDto, Item, ItemFilterParams, UpdateItemDto};
use crate::modules::restaurants::service::RestaurantService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::Envelope;
use crate::validator::ValidatedJson;

use super::service::ItemService;

/// Create an item for the calling restaurant
#[utoipa::path(
    post,
    path = "/api/item",
    request_body = CreateItemDto,
    responses(
        (status = 200, description = "Item created", body = Envelope<Item>),
        (status = 401, description = "Missing restaurant context"),
        (status = 404, description = "Owning restaurant not found"),
    ),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    RestaurantContext(restaurant_id): RestaurantContext,
    ValidatedJson(dto): ValidatedJson<CreateItemDto>,
) -> Result<Json<Envelope<Item>>, AppError> {
    // The owning restaurant must exist (and not be soft-deleted).
    if RestaurantService::find_by_id(&state.db, restaurant_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found(anyhow::anyhow!("restaurant_not_found")));
    }

    let item = ItemService::insert(&state.db, restaurant_id, &dto).await?;
    Ok(Json(Envelope::ok(item)))
}

/// List items
#[utoipa::path(
    get,
    path = "/api/item",
    params(
        ("page" = Option<String>, Query, description = "Page number, 1-based"),
        ("limit" = Option<String>, Query, description = "Rows per page"),
        ("sort_by" = Option<String>, Query, description = "Sort column"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
        ("keyword" = Option<String>, Query, description = "Name substring"),
        ("name" = Option<String>, Query, description = "Name substring"),
        ("restaurant_id" = Option<String>, Query, description = "Owning restaurant"),
    ),
    responses(
        (status = 200, description = "Paginated items", body = Envelope<Vec<Item>>),
    ),
    tag = "Items"
)]
pub async fn index_items(
    State(state): State<AppState>,
    filter: Result<Query<ItemFilterParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Item>>>, AppError> {
    let Query(filter) = filter
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let (count, rows) = ItemService::list(&state.db, &filter).await?;
    Ok(Json(Envelope::paginated(
        rows,
        count,
        filter.pagination.limit(),
        filter.pagination.page(),
    )))
}

/// Get one item
#[utoipa::path(
    get,
    path = "/api/item/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = Envelope<Item>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Item>>, AppError> {
    let item = ItemService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("item_not_found")))?;

    Ok(Json(Envelope::ok(item)))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/api/item/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateItemDto,
    responses(
        (status = 200, description = "Updated item", body = Envelope<Item>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateItemDto>,
) -> Result<Json<Envelope<Item>>, AppError> {
    if ItemService::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::not_found(anyhow::anyhow!("item_not_found")));
    }

    let item = ItemService::update(&state.db, id, &dto).await?;
    Ok(Json(Envelope::ok(item)))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/item/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Deleted item snapshot", body = Envelope<Item>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Item>>, AppError> {
    let item = ItemService::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("item_not_found")))?;

    Ok(Json(Envelope::ok(item)))
}
