//! Request extractors whose rejections use the API error envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body.
///
/// Behaves like [`axum::Json`], but a missing content type, malformed JSON or
/// a body that does not match `T` is answered with a 400 `VALIDATION_ERROR`
/// instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
