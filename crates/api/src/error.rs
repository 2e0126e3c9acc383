use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inutile_core::error::CoreError;
use serde::Serialize;
use utoipa::ToSchema;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "success": false, "error": "...", "code": "..." }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `inutile_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Body of every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    /// Machine-readable error code, e.g. `VALIDATION_ERROR`.
    pub code: String,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => classify_core_error(core),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            err.to_string(),
        ),
        CoreError::AccountDisabled => {
            (StatusCode::FORBIDDEN, "ACCOUNT_DISABLED", err.to_string())
        }
        CoreError::InvalidOrExpiredToken => (
            StatusCode::BAD_REQUEST,
            "INVALID_OR_EXPIRED_TOKEN",
            err.to_string(),
        ),
        CoreError::AlreadyActivated(_) => {
            (StatusCode::CONFLICT, "ALREADY_ACTIVATED", err.to_string())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400.
/// - Check constraint violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
///
/// Constraint names never reach the client; see [`constraint_message`].
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        constraint_message(constraint, "Duplicate value").to_string(),
                    );
                }
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "BAD_REQUEST",
                        constraint_message(constraint, "Referenced resource does not exist").to_string(),
                    );
                }
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        constraint_message(constraint, "Invalid value").to_string(),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Client-facing message for a violated constraint, or `fallback` for
/// constraints without a dedicated message.
fn constraint_message(constraint: &str, fallback: &'static str) -> &'static str {
    match constraint {
        "uq_users_email" => "An account with this email already exists",
        "uq_profiles_slug" => "This slug is already taken",
        "uq_client_cards_serial_number" => "A card with this serial number already exists",
        "uq_companies_slug" => "A company with this slug already exists",
        "uq_subscriptions_slug" => "A plan with this slug already exists",
        "uq_user_finances_user_id" => "Finance record already exists for this user",
        "fk_users_company_id" => "Company does not exist",
        "fk_companies_subscription_id" => "Subscription plan does not exist",
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn core_errors_map_to_status_and_code() {
        let cases = [
            (CoreError::not_found("Card", "X"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (CoreError::InvalidOrExpiredToken, StatusCode::BAD_REQUEST, "INVALID_OR_EXPIRED_TOKEN"),
            (CoreError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (CoreError::AccountDisabled, StatusCode::FORBIDDEN, "ACCOUNT_DISABLED"),
            (CoreError::AlreadyActivated("IC-1".into()), StatusCode::CONFLICT, "ALREADY_ACTIVATED"),
            (CoreError::Conflict("dup".into()), StatusCode::CONFLICT, "CONFLICT"),
        ];
        for (err, status, code) in cases {
            let (got_status, body) = render(AppError::Core(err)).await;
            assert_eq!(got_status, status);
            assert_eq!(body["code"], code);
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = render(AppError::InternalError("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn row_not_found_is_404() {
        let (status, _) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn constraint_names_are_not_exposed() {
        assert_eq!(
            constraint_message("uq_users_email", "Duplicate value"),
            "An account with this email already exists"
        );
        assert_eq!(constraint_message("ck_orders_total", "Invalid value"), "Invalid value");
        assert_eq!(constraint_message("profiles_user_id_fkey", "Missing"), "Missing");
    }
}
