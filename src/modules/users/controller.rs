use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use uuid::Uuid;

use crate::middleware::context::UserContext;
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User, UserFilterParams};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::Envelope;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Uniqueness pre-checks shared by create and update. `exclude` skips the
/// user being updated so keeping the same phone/email succeeds.
async fn check_identity_free(
    state: &AppState,
    phone: Option<&str>,
    email: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(phone) = phone
        && let Some(existing) = UserService::find_by_phone(&state.db, phone).await?
        && Some(existing.id) != exclude
    {
        return Err(AppError::bad_request(anyhow::anyhow!("phone_exist")));
    }

    if let Some(email) = email
        && let Some(existing) = UserService::find_by_email(&state.db, email).await?
        && Some(existing.id) != exclude
    {
        return Err(AppError::bad_request(anyhow::anyhow!("email_exist")));
    }

    Ok(())
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/account",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = Envelope<User>),
        (status = 400, description = "Validation failure or duplicate phone/email"),
    ),
    tag = "Accounts"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<Envelope<User>>, AppError> {
    check_identity_free(&state, Some(dto.phone.as_str()), Some(dto.email.as_str()), None).await?;

    let user = UserService::insert(&state.db, &dto).await?;
    Ok(Json(Envelope::ok(user)))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/account",
    params(
        ("page" = Option<String>, Query, description = "Page number, 1-based"),
        ("limit" = Option<String>, Query, description = "Rows per page"),
        ("sort_by" = Option<String>, Query, description = "Sort column"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
        ("keyword" = Option<String>, Query, description = "Substring across name fields"),
        ("phone" = Option<String>, Query, description = "Exact phone"),
        ("email" = Option<String>, Query, description = "Exact email"),
        ("user_name" = Option<String>, Query, description = "User name substring"),
        ("first_name" = Option<String>, Query, description = "First name substring"),
        ("last_name" = Option<String>, Query, description = "Last name substring"),
        ("citizen_id" = Option<String>, Query, description = "Exact citizen id"),
        ("status" = Option<String>, Query, description = "Status value"),
        ("type" = Option<String>, Query, description = "Account type value"),
        ("lower_score" = Option<String>, Query, description = "Minimum score"),
        ("higher_score" = Option<String>, Query, description = "Maximum score"),
    ),
    responses(
        (status = 200, description = "Paginated users", body = Envelope<Vec<User>>),
    ),
    tag = "Accounts"
)]
pub async fn index_users(
    State(state): State<AppState>,
    filter: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<User>>>, AppError> {
    let Query(filter) = filter
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let (count, rows) = UserService::list(&state.db, &filter).await?;
    Ok(Json(Envelope::paginated(
        rows,
        count,
        filter.pagination.limit(),
        filter.pagination.page(),
    )))
}

/// Get the calling user's profile
#[utoipa::path(
    get,
    path = "/api/account/me",
    responses(
        (status = 200, description = "Profile", body = Envelope<User>),
        (status = 401, description = "Missing caller context"),
        (status = 404, description = "User not found"),
    ),
    tag = "Accounts"
)]
pub async fn get_me(
    State(state): State<AppState>,
    UserContext(user_id): UserContext,
) -> Result<Json<Envelope<User>>, AppError> {
    let user = UserService::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("user_not_found")))?;

    Ok(Json(Envelope::ok(user)))
}

/// Update the calling user's profile
#[utoipa::path(
    put,
    path = "/api/account/me",
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated profile", body = Envelope<User>),
        (status = 400, description = "Duplicate phone/email"),
        (status = 401, description = "Missing caller context"),
        (status = 404, description = "User not found"),
    ),
    tag = "Accounts"
)]
pub async fn update_me(
    State(state): State<AppState>,
    UserContext(user_id): UserContext,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<Envelope<User>>, AppError> {
    update_user_inner(&state, user_id, dto).await
}

/// Get one user
#[utoipa::path(
    get,
    path = "/api/account/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = Envelope<User>),
        (status = 404, description = "User not found"),
    ),
    tag = "Accounts"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<User>>, AppError> {
    let user = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("user_not_found")))?;

    Ok(Json(Envelope::ok(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/account/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = Envelope<User>),
        (status = 400, description = "Duplicate phone/email"),
        (status = 404, description = "User not found"),
    ),
    tag = "Accounts"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<Envelope<User>>, AppError> {
    update_user_inner(&state, id, dto).await
}

async fn update_user_inner(
    state: &AppState,
    id: Uuid,
    dto: UpdateUserDto,
) -> Result<Json<Envelope<User>>, AppError> {
    let existing = UserService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("user_not_found")))?;

    // Re-check a unique field only when it actually changes.
    let phone = dto.phone.as_deref().filter(|p| *p != existing.phone);
    let email = dto.email.as_deref().filter(|e| *e != existing.email);
    check_identity_free(state, phone, email, Some(id)).await?;

    let user = UserService::update(&state.db, id, &dto).await?;
    Ok(Json(Envelope::ok(user)))
}

/// Delete a user. The operation is implemented but deliberately not bound
/// in the router: account deletion is not exposed over HTTP.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<User>>, AppError> {
    let user = UserService::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("user_not_found")))?;

    Ok(Json(Envelope::ok(user)))
}
