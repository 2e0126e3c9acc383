//! Handlers for the `/users` resource.
//!
//! `/users/me` is the caller's own account. The remaining routes are admin
//! only and use soft deletion (`is_active = false`).

use axum::extract::{Path, Query, State};
use axum::Json;
use inutile_core::error::CoreError;
use inutile_core::pagination::offset;
use inutile_core::roles::validate_role;
use inutile_core::types::DbId;
use inutile_db::models::user::{UpdateUser, UserResponse};
use inutile_db::repositories::{ProfileRepo, UserRepo};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::state::AppState;

/// Fields a user may change on their own account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    summary = "Own account",
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/me
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "users",
    summary = "Update own account",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateMeRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    for name in [&input.first_name, &input.last_name].into_iter().flatten() {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Names cannot be empty".into()).into());
        }
    }

    let update = UpdateUser {
        first_name: input.first_name.map(|n| n.trim().to_string()),
        last_name: input.last_name.map(|n| n.trim().to_string()),
        phone: input.phone,
        avatar_url: input.avatar_url,
        ..Default::default()
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    Ok(Json(ApiResponse::with_message(user.into(), "Account updated")))
}

/// DELETE /api/users/me
///
/// Deactivates the account and hides its profile.
#[utoipa::path(
    delete,
    path = "/api/users/me",
    tag = "users",
    summary = "Deactivate own account",
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MessageResponse>> {
    if !UserRepo::deactivate(&state.pool, auth.user_id).await? {
        return Err(CoreError::not_found("User", auth.user_id).into());
    }
    ProfileRepo::hide_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, "Account deactivated by owner");

    Ok(Json(MessageResponse::new("Account deleted")))
}

/// GET /api/users?page=&limit=&search=
///
/// Also mounted as `GET /api/admin/users`.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    summary = "List users (paginated, searchable)",
    params(PageParams),
    responses(
        (status = 200, description = "Success", body = PaginatedResponse<UserResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let (page, limit) = params.resolve_default();
    let search = params.search();

    let users = UserRepo::list(&state.pool, search, limit, offset(page, limit)).await?;
    let total = UserRepo::count(&state.pool, search).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, page, limit, total)))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    summary = "Get a user",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    summary = "Update a user",
    request_body = UpdateUser,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    AppJson(input): AppJson<UpdateUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if let Some(role) = &input.role {
        validate_role(role).map_err(CoreError::Validation)?;
    }
    let user = UserRepo::update(&state.pool, user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /api/users/{id}
///
/// Soft delete: the account is deactivated and its profile hidden.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    summary = "Deactivate a user",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;

    if user.is_active {
        UserRepo::deactivate(&state.pool, user_id).await?;
    }
    ProfileRepo::hide_for_user(&state.pool, user_id).await?;

    tracing::info!(user_id, admin_id = admin.user_id, "User deactivated");

    Ok(Json(MessageResponse::new("User deactivated")))
}
