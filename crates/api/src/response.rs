//! Shared response envelope types for API handlers.
//!
//! Every successful response is `{ "success": true, "data": ..., "message": ... }`
//! with `message` omitted when absent. List endpoints that page their results
//! add a `pagination` block. Use these types instead of ad-hoc
//! `serde_json::json!` bodies.

use inutile_core::pagination::Pagination;
use serde::Serialize;
use utoipa::ToSchema;

/// Standard `{ "success": true, "data": T }` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// `{ "success": true, "message": "..." }` for operations with no payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `{ "success": true, "data": [...], "pagination": {...} }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            success: true,
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": 1 }));
    }

    #[test]
    fn paginated_envelope_uses_camel_case() {
        let body = serde_json::to_value(PaginatedResponse::new(vec!["a"], 1, 1, 3)).unwrap();
        assert_eq!(body["pagination"]["totalPages"], 3);
        assert_eq!(body["pagination"]["hasMore"], true);
    }
}
