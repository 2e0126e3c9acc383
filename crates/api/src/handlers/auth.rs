//! Handlers for the `/auth` resource (registration, login, password flows).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use inutile_core::error::CoreError;
use inutile_core::slug::base_slug;
use inutile_core::validation::validate_input;
use inutile_db::models::user::{CreateUser, User, UserResponse};
use inutile_db::repositories::{AccountRepo, ProfileRepo, UserRepo};
use inutile_events::Notification;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_reset_token, hash_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_dummy_password, verify_password,
};
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Lifetime of a password-reset token.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Returned by forgot-password regardless of whether the account exists.
const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for this email, a password reset link has been sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
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

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for `PUT /auth/change-password`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
}

/// Slug of the caller's profile, embedded in auth responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileRef {
    pub slug: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    pub user: UserResponse,
    pub profile: Option<ProfileRef>,
    pub token: String,
}

/// Returned by `GET /auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeData {
    pub user: UserResponse,
    pub profile: Option<ProfileRef>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a user with a profile and a finance record, then sign them in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    summary = "Create an account with profile and finance record",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<AuthData>),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    validate_input(&input)?;

    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let create = CreateUser {
        email: input.email.trim().to_lowercase(),
        password_hash: hash_new_password(&input.password)?,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        phone: input.phone,
        role: None,
        company_id: None,
    };
    let base = base_slug(&create.first_name, &create.last_name);
    let (user, profile) = AccountRepo::register(&state.pool, &create, &base).await?;

    tracing::info!(user_id = user.id, slug = %profile.slug, "User registered");

    state.mailer.dispatch(
        user.email.clone(),
        Notification::Welcome {
            first_name: user.first_name.clone(),
            profile_url: state.config.profile_url(&profile.slug),
        },
    );

    let token = issue_token(&state, &user)?;
    let data = AuthData {
        user: user.into(),
        profile: Some(ProfileRef { slug: profile.slug }),
        token,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(data, "Registration successful")),
    ))
}

/// POST /api/auth/login
///
/// Unknown accounts and wrong passwords produce the same error.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    summary = "Sign in and receive a session token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<AuthData>),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthData>>> {
    validate_input(&input)?;

    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        verify_dummy_password(&input.password);
        return Err(AppError::Core(CoreError::InvalidCredentials));
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::AccountDisabled));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let profile = ProfileRepo::find_by_user_id(&state.pool, user.id).await?;
    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::with_message(
        AuthData {
            user: user.into(),
            profile: profile.map(|p| ProfileRef { slug: p.slug }),
            token,
        },
        "Login successful",
    )))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    summary = "Current user and profile slug",
    responses(
        (status = 200, description = "Success", body = ApiResponse<MeData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MeData>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;
    let profile = ProfileRepo::find_by_user_id(&state.pool, user.id).await?;

    Ok(Json(ApiResponse::ok(MeData {
        user: user.into(),
        profile: profile.map(|p| ProfileRef { slug: p.slug }),
    })))
}

/// POST /api/auth/forgot-password
///
/// Always answers with the same message so the endpoint cannot be used to
/// discover which emails are registered.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "auth",
    summary = "Email a password reset link",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_input(&input)?;

    let user = UserRepo::find_by_email(&state.pool, input.email.trim()).await?;
    if let Some(user) = user.filter(|u| u.is_active) {
        let (token, token_hash) = generate_reset_token();
        let expires = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        UserRepo::set_reset_token(&state.pool, user.id, &token_hash, expires).await?;

        state.mailer.dispatch(
            user.email.clone(),
            Notification::PasswordReset {
                first_name: user.first_name.clone(),
                reset_url: state.config.reset_password_url(&token),
            },
        );
        tracing::info!(user_id = user.id, "Password reset requested");
    }

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/auth/reset-password
///
/// Consumes the token: a second use fails as invalid.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "auth",
    summary = "Set a new password with a reset token",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_input(&input)?;

    let token_hash = hash_token(input.token.trim());
    let password_hash = hash_new_password(&input.password)?;

    let user = UserRepo::complete_password_reset(&state.pool, &token_hash, &password_hash)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidOrExpiredToken))?;

    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(MessageResponse::new("Password has been reset")))
}

/// PUT /api/auth/change-password
#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "auth",
    summary = "Change the password of the current user",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_input(&input)?;
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_new_password(&input.new_password)?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(MessageResponse::new("Password updated")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign a session token for `user`.
pub(crate) fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    generate_access_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

/// Hash a password supplied by a client.
pub(crate) fn hash_new_password(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}
