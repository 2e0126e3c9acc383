//! Handlers for the `/companies` resource: corporate accounts, their
//! employees and the cards assigned to them. Admin only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use inutile_core::company::{
    available_slots, check_card_capacity, check_employee_capacity, validate_status,
};
use inutile_core::error::CoreError;
use inutile_core::slug::{base_slug, validate_slug};
use inutile_core::types::DbId;
use inutile_core::validation::validate_input;
use inutile_db::models::client_card::ClientCard;
use inutile_db::models::company::{
    Company, CompanyStats, CompanyWithCounts, CreateCompany, UpdateCompany,
};
use inutile_db::models::user::{CreateUser, UserResponse};
use inutile_db::repositories::{AccountRepo, ClientCardRepo, CompanyRepo, ProfileRepo, UserRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::handlers::auth::hash_new_password;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /companies/{id}/employees`: either an existing user id or
/// the details of a new account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AddEmployeeRequest {
    Existing {
        #[serde(rename = "userId")]
        #[schema(value_type = i64)]
        user_id: DbId,
    },
    New(NewEmployee),
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStatsResponse {
    #[serde(flatten)]
    pub stats: CompanyStats,
    pub max_employees: i32,
    pub max_cards: i32,
    pub available_slots: i64,
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

/// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "companies",
    summary = "List companies with counts",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<CompanyWithCounts>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_companies(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CompanyWithCounts>>>> {
    let companies = CompanyRepo::list_with_counts(&state.pool).await?;
    Ok(Json(ApiResponse::ok(companies)))
}

/// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "companies",
    summary = "Get a company",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Company>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_company(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Company>>> {
    let company = find_company(&state, company_id).await?;
    Ok(Json(ApiResponse::ok(company)))
}

/// POST /api/companies
///
/// The designated admin user becomes the first member of the company.
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "companies",
    summary = "Create a company",
    request_body = CreateCompany,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Company>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_company(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateCompany>,
) -> AppResult<(StatusCode, Json<ApiResponse<Company>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Company name is required".into()).into());
    }
    input.slug = input.slug.trim().to_lowercase();
    validate_slug(&input.slug).map_err(CoreError::Validation)?;
    validate_limits(input.max_employees, input.max_cards)?;

    let owner = UserRepo::find_by_id(&state.pool, input.admin_user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", input.admin_user_id))?;
    if owner.company_id.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "The admin user already belongs to a company".into(),
        )));
    }

    let company = CompanyRepo::create(&state.pool, &input).await?;

    tracing::info!(company_id = company.id, slug = %company.slug, admin_id = admin.user_id, "Company created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(company))))
}

/// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "companies",
    summary = "Update a company",
    request_body = UpdateCompany,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Company>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_company(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateCompany>,
) -> AppResult<Json<ApiResponse<Company>>> {
    if let Some(slug) = input.slug.as_mut() {
        *slug = slug.trim().to_lowercase();
        validate_slug(slug).map_err(CoreError::Validation)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    validate_limits(input.max_employees, input.max_cards)?;

    let company = CompanyRepo::update(&state.pool, company_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Company", company_id))?;
    Ok(Json(ApiResponse::ok(company)))
}

/// DELETE /api/companies/{id}
///
/// Refused while the company has employees besides its admin user.
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "companies",
    summary = "Delete a company without employees",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_company(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    find_company(&state, company_id).await?;

    let members = CompanyRepo::count_non_admin_members(&state.pool, company_id).await?;
    if members > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Company still has {members} employee(s); remove them first"
        ))));
    }

    CompanyRepo::delete(&state.pool, company_id).await?;
    tracing::info!(company_id, admin_id = admin.user_id, "Company deleted");
    Ok(Json(MessageResponse::new("Company deleted")))
}

/// GET /api/companies/{id}/stats
#[utoipa::path(
    get,
    path = "/api/companies/{id}/stats",
    tag = "companies",
    summary = "Company counters",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<CompanyStatsResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_company_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CompanyStatsResponse>>> {
    let company = find_company(&state, company_id).await?;
    let stats = CompanyRepo::stats(&state.pool, company_id).await?;

    Ok(Json(ApiResponse::ok(CompanyStatsResponse {
        available_slots: available_slots(stats.total_employees, company.max_employees),
        max_employees: company.max_employees,
        max_cards: company.max_cards,
        stats,
    })))
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

/// GET /api/companies/{id}/employees
#[utoipa::path(
    get,
    path = "/api/companies/{id}/employees",
    tag = "companies",
    summary = "List employees",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<UserResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_employees(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    find_company(&state, company_id).await?;
    let users = UserRepo::list_by_company(&state.pool, company_id).await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/companies/{id}/employees
///
/// Attaches an existing user, or creates a new account (with profile and
/// finance record) directly inside the company.
#[utoipa::path(
    post,
    path = "/api/companies/{id}/employees",
    tag = "companies",
    summary = "Add an existing or new employee",
    request_body = AddEmployeeRequest,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 201, description = "Created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn add_employee(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    AppJson(input): AppJson<AddEmployeeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let company = find_company(&state, company_id).await?;
    let current = UserRepo::count_by_company(&state.pool, company_id).await?;
    check_employee_capacity(current, company.max_employees)?;

    let user = match input {
        AddEmployeeRequest::Existing { user_id } => {
            let user = UserRepo::find_by_id(&state.pool, user_id)
                .await?
                .ok_or_else(|| CoreError::not_found("User", user_id))?;
            if user.company_id.is_some() {
                return Err(AppError::Core(CoreError::Conflict(
                    "User already belongs to a company".into(),
                )));
            }
            UserRepo::join_company(&state.pool, user_id, company_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Conflict("User already belongs to a company".into())
                })?
        }
        AddEmployeeRequest::New(new) => {
            validate_input(&new)?;
            if UserRepo::email_exists(&state.pool, &new.email).await? {
                return Err(AppError::Core(CoreError::Conflict(
                    "An account with this email already exists".into(),
                )));
            }
            let create = CreateUser {
                email: new.email.trim().to_lowercase(),
                password_hash: hash_new_password(&new.password)?,
                first_name: new.first_name.trim().to_string(),
                last_name: new.last_name.trim().to_string(),
                phone: new.phone,
                role: None,
                company_id: Some(company_id),
            };
            let base = base_slug(&create.first_name, &create.last_name);
            let (user, _profile) = AccountRepo::register(&state.pool, &create, &base).await?;
            user
        }
    };

    tracing::info!(company_id, user_id = user.id, admin_id = admin.user_id, "Employee added");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// DELETE /api/companies/{id}/employees/{user_id}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}/employees/{user_id}",
    tag = "companies",
    summary = "Remove an employee",
    params(("id" = i64, Path, description = "Resource id"), ("user_id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn remove_employee(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((company_id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    find_company(&state, company_id).await?;
    if !UserRepo::leave_company(&state.pool, user_id, company_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "User is not an employee of this company".into(),
        )));
    }
    tracing::info!(company_id, user_id, admin_id = admin.user_id, "Employee removed");
    Ok(Json(MessageResponse::new("Employee removed")))
}

// ---------------------------------------------------------------------------
// Card assignment
// ---------------------------------------------------------------------------

/// POST /api/companies/{id}/employees/{user_id}/assign-card/{card_id}
///
/// The card must be unowned. Ownership is claimed in a single conditional
/// update, so two concurrent assignments of one card cannot both succeed.
#[utoipa::path(
    post,
    path = "/api/companies/{id}/employees/{user_id}/assign-card/{card_id}",
    tag = "companies",
    summary = "Assign a card to an employee",
    params(("id" = i64, Path, description = "Resource id"), ("user_id" = i64, Path, description = "User id"), ("card_id" = i64, Path, description = "Card id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn assign_card(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((company_id, user_id, card_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    let company = find_company(&state, company_id).await?;
    ensure_employee(&state, company_id, user_id).await?;

    let cards = ClientCardRepo::count_by_company(&state.pool, company_id).await?;
    check_card_capacity(cards, company.max_cards)?;

    let profile_id = ProfileRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .map(|p| p.id);

    let Some(card) = ClientCardRepo::assign(&state.pool, card_id, user_id, profile_id).await?
    else {
        return Err(match ClientCardRepo::find_by_id(&state.pool, card_id).await? {
            None => CoreError::not_found("Card", card_id).into(),
            Some(_) => CoreError::Conflict("Card is already assigned".into()).into(),
        });
    };

    tracing::info!(company_id, user_id, card_id, admin_id = admin.user_id, "Card assigned");

    Ok(Json(ApiResponse::with_message(card, "Card assigned")))
}

/// POST /api/companies/{id}/employees/{user_id}/unassign-card/{card_id}
#[utoipa::path(
    post,
    path = "/api/companies/{id}/employees/{user_id}/unassign-card/{card_id}",
    tag = "companies",
    summary = "Release an employee's card",
    params(("id" = i64, Path, description = "Resource id"), ("user_id" = i64, Path, description = "User id"), ("card_id" = i64, Path, description = "Card id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn unassign_card(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((company_id, user_id, card_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    find_company(&state, company_id).await?;
    ensure_employee(&state, company_id, user_id).await?;

    let card = ClientCardRepo::unassign(&state.pool, card_id, user_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation("Card is not assigned to this employee".into())
        })?;

    tracing::info!(company_id, user_id, card_id, admin_id = admin.user_id, "Card unassigned");

    Ok(Json(ApiResponse::with_message(card, "Card unassigned")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_company(state: &AppState, company_id: DbId) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, company_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Company", company_id).into())
}

async fn ensure_employee(state: &AppState, company_id: DbId, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    if user.company_id != Some(company_id) {
        return Err(AppError::Core(CoreError::Validation(
            "User is not an employee of this company".into(),
        )));
    }
    Ok(())
}

fn validate_limits(max_employees: Option<i32>, max_cards: Option<i32>) -> AppResult<()> {
    if max_employees.is_some_and(|m| m < 0) || max_cards.is_some_and(|m| m < 0) {
        return Err(CoreError::Validation("Limits must not be negative".into()).into());
    }
    Ok(())
}
