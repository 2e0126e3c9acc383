//! Handlers for the `/templates` resource: predefined profile themes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inutile_core::error::CoreError;
use inutile_core::profile::validate_theme;
use inutile_core::types::DbId;
use inutile_db::models::profile::Profile;
use inutile_db::models::template::{CreateTemplate, Template, UpdateTemplate};
use inutile_db::repositories::{ProfileRepo, TemplateRepo};

use crate::error::{AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// GET /api/templates
///
/// Active templates, free ones first.
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "templates",
    summary = "Active templates",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<Template>>)
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Template>>>> {
    let templates = TemplateRepo::list_active(&state.pool).await?;
    Ok(Json(ApiResponse::ok(templates)))
}

/// GET /api/templates/all
#[utoipa::path(
    get,
    path = "/api/templates/all",
    tag = "templates",
    summary = "Every template",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<Template>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_all_templates(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Template>>>> {
    let templates = TemplateRepo::list_all(&state.pool).await?;
    Ok(Json(ApiResponse::ok(templates)))
}

/// GET /api/templates/{id}
#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    tag = "templates",
    summary = "Get a template",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Template>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Template>>> {
    let template = find_template(&state, template_id).await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// POST /api/templates/{id}/apply
///
/// Copies the template theme onto the caller's profile.
#[utoipa::path(
    post,
    path = "/api/templates/{id}/apply",
    tag = "templates",
    summary = "Apply a template to own profile",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn apply_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let template = find_template(&state, template_id).await?;
    if !template.is_active {
        return Err(CoreError::Validation("This template is not available".into()).into());
    }

    let profile = ProfileRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", auth.user_id))?;

    let updated = ProfileRepo::apply_template(&state.pool, profile.id, template.id, &template.theme.0)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile.id))?;

    tracing::info!(profile_id = updated.id, template_id, "Template applied");

    Ok(Json(ApiResponse::with_message(updated, "Template applied")))
}

/// POST /api/templates
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "templates",
    summary = "Create a template",
    request_body = CreateTemplate,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Template>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTemplate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Template>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Template name is required".into()).into());
    }
    validate_theme(&input.theme).map_err(CoreError::Validation)?;

    let template = TemplateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(template))))
}

/// PUT /api/templates/{id}
#[utoipa::path(
    put,
    path = "/api/templates/{id}",
    tag = "templates",
    summary = "Update a template",
    request_body = UpdateTemplate,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Template>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    AppJson(input): AppJson<UpdateTemplate>,
) -> AppResult<Json<ApiResponse<Template>>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CoreError::Validation("Template name cannot be empty".into()).into());
    }
    if let Some(theme) = &input.theme {
        validate_theme(theme).map_err(CoreError::Validation)?;
    }

    let template = TemplateRepo::update(&state.pool, template_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", template_id))?;
    Ok(Json(ApiResponse::ok(template)))
}

/// DELETE /api/templates/{id}
#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    tag = "templates",
    summary = "Delete a template",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !TemplateRepo::delete(&state.pool, template_id).await? {
        return Err(CoreError::not_found("Template", template_id).into());
    }
    Ok(Json(MessageResponse::new("Template deleted")))
}

async fn find_template(state: &AppState, template_id: DbId) -> AppResult<Template> {
    TemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Template", template_id).into())
}
