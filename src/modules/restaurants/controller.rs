use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use tracing::debug;
use uuid::Uuid;

use crate::modules::restaurants::model::{
    CreateRestaurantDto, RESTAURANT_CODE_DIGITS, RESTAURANT_CODE_PREFIX, RESTAURANT_PASSWORD_LEN,
    Restaurant, RestaurantFilterParams, UpdateRestaurantDto,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;
use crate::utils::response::Envelope;
use crate::utils::strings::{generate_code, generate_random_string};
use crate::validator::ValidatedJson;

use super::service::RestaurantService;

/// Attempts before giving up on finding an unused code.
const MAX_CODE_ATTEMPTS: usize = 5;

async fn generate_unique_code(state: &AppState) -> Result<String, AppError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = generate_code(RESTAURANT_CODE_PREFIX, RESTAURANT_CODE_DIGITS);
        if RestaurantService::find_by_code(&state.db, &candidate)
            .await?
            .is_none()
        {
            return Ok(candidate);
        }
        debug!(code = %candidate, "Generated code already taken, retrying");
    }

    Err(AppError::internal(anyhow::anyhow!("code_generation_failed")))
}

/// Create a restaurant
#[utoipa::path(
    post,
    path = "/api/restaurant",
    request_body = CreateRestaurantDto,
    responses(
        (status = 200, description = "Restaurant created", body = Envelope<Restaurant>),
        (status = 400, description = "Validation failure or duplicate phone"),
    ),
    tag = "Restaurants"
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRestaurantDto>,
) -> Result<Json<Envelope<Restaurant>>, AppError> {
    if RestaurantService::find_by_phone(&state.db, &dto.phone)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request(anyhow::anyhow!("phone_exist")));
    }

    // The initial password is generated here at the routing boundary and
    // handed to the owner out of band; only its hash is stored.
    let password = generate_random_string(RESTAURANT_PASSWORD_LEN);
    let password_hash = hash_password(&password)?;
    let code = generate_unique_code(&state).await?;

    let restaurant = RestaurantService::insert(&state.db, &dto, &code, &password_hash).await?;
    Ok(Json(Envelope::ok(restaurant)))
}

/// List restaurants
#[utoipa::path(
    get,
    path = "/api/restaurant",
    params(
        ("page" = Option<String>, Query, description = "Page number, 1-based"),
        ("limit" = Option<String>, Query, description = "Rows per page"),
        ("sort_by" = Option<String>, Query, description = "Sort column"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
        ("code" = Option<String>, Query, description = "Exact code"),
        ("name" = Option<String>, Query, description = "Name substring"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("district" = Option<String>, Query, description = "District substring"),
        ("phone" = Option<String>, Query, description = "Exact phone"),
        ("keyword" = Option<String>, Query, description = "Substring across name and address"),
        ("address" = Option<String>, Query, description = "Address substring"),
        ("lower_score" = Option<String>, Query, description = "Minimum lower score"),
        ("higher_score" = Option<String>, Query, description = "Maximum higher score"),
    ),
    responses(
        (status = 200, description = "Paginated restaurants", body = Envelope<Vec<Restaurant>>),
    ),
    tag = "Restaurants"
)]
pub async fn index_restaurants(
    State(state): State<AppState>,
    filter: Result<Query<RestaurantFilterParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Restaurant>>>, AppError> {
    let Query(filter) = filter
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let (count, rows) = RestaurantService::list(&state.db, &filter).await?;
    Ok(Json(Envelope::paginated(
        rows,
        count,
        filter.pagination.limit(),
        filter.pagination.page(),
    )))
}

/// Get one restaurant
#[utoipa::path(
    get,
    path = "/api/restaurant/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant", body = Envelope<Restaurant>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Restaurants"
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Restaurant>>, AppError> {
    let restaurant = RestaurantService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("restaurant_not_found")))?;

    Ok(Json(Envelope::ok(restaurant)))
}

/// Update a restaurant
#[utoipa::path(
    put,
    path = "/api/restaurant/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = UpdateRestaurantDto,
    responses(
        (status = 200, description = "Updated restaurant", body = Envelope<Restaurant>),
        (status = 400, description = "Duplicate phone"),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Restaurants"
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRestaurantDto>,
) -> Result<Json<Envelope<Restaurant>>, AppError> {
    let existing = RestaurantService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("restaurant_not_found")))?;

    // Only re-check uniqueness when the phone actually changes.
    if let Some(phone) = &dto.phone
        && *phone != existing.phone
        && RestaurantService::find_by_phone(&state.db, phone)
            .await?
            .is_some()
    {
        return Err(AppError::bad_request(anyhow::anyhow!("phone_exist")));
    }

    let password_hash = match &dto.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let restaurant = RestaurantService::update(&state.db, id, &dto, password_hash).await?;
    Ok(Json(Envelope::ok(restaurant)))
}

/// Delete a restaurant
#[utoipa::path(
    delete,
    path = "/api/restaurant/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Deleted restaurant snapshot", body = Envelope<Restaurant>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Restaurants"
)]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Restaurant>>, AppError> {
    let restaurant = RestaurantService::soft_delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("restaurant_not_found")))?;

    Ok(Json(Envelope::ok(restaurant)))
}
