//! Handlers for the `/finances` resource: saved payment cards, the billing
//! snapshot of the current plan, bills and physical card orders.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inutile_core::error::CoreError;
use inutile_core::finance::{
    validate_card_type, validate_payment_card, validate_physical_transition, PaymentCard,
    SubscriptionSnapshot, DEFAULT_BILLS_LIMIT,
};
use inutile_core::pagination::offset;
use inutile_core::types::DbId;
use inutile_db::models::finance::{Bill, PhysicalCard};
use inutile_db::repositories::{BillRepo, FinanceRepo, PhysicalCardRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::state::AppState;

/// Number of bills shown on the overview.
const OVERVIEW_BILLS: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentCardRequest {
    pub last4: String,
    pub brand: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderPhysicalCardRequest {
    #[serde(rename = "type")]
    pub card_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhysicalCardRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceOverview {
    pub payment_cards: Vec<PaymentCard>,
    pub subscription: Option<SubscriptionSnapshot>,
    pub recent_bills: Vec<Bill>,
    pub physical_cards: Vec<PhysicalCard>,
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// GET /api/finances/overview
#[utoipa::path(
    get,
    path = "/api/finances/overview",
    tag = "finances",
    summary = "Cards, plan, recent bills and physical cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<FinanceOverview>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<FinanceOverview>>> {
    let finance = FinanceRepo::get_or_create(&state.pool, auth.user_id).await?;
    let recent_bills = BillRepo::list_by_user(&state.pool, auth.user_id, OVERVIEW_BILLS, 0).await?;
    let physical_cards = PhysicalCardRepo::list_by_user(&state.pool, auth.user_id).await?;

    Ok(Json(ApiResponse::ok(FinanceOverview {
        payment_cards: finance.payment_cards.0 .0,
        subscription: finance.subscription.map(|s| s.0),
        recent_bills,
        physical_cards,
    })))
}

/// GET /api/finances/subscription
#[utoipa::path(
    get,
    path = "/api/finances/subscription",
    tag = "finances",
    summary = "Current plan snapshot",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Option<SubscriptionSnapshot>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Option<SubscriptionSnapshot>>>> {
    let finance = FinanceRepo::find_by_user(&state.pool, auth.user_id).await?;
    let snapshot = finance.and_then(|f| f.subscription).map(|s| s.0);
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/finances/bills?page=&limit=
#[utoipa::path(
    get,
    path = "/api/finances/bills",
    tag = "finances",
    summary = "Bills (paginated)",
    params(PageParams),
    responses(
        (status = 200, description = "Success", body = PaginatedResponse<Bill>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_bills(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Bill>>> {
    let (page, limit) = params.resolve(DEFAULT_BILLS_LIMIT);
    let bills =
        BillRepo::list_by_user(&state.pool, auth.user_id, limit, offset(page, limit)).await?;
    let total = BillRepo::count_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(PaginatedResponse::new(bills, page, limit, total)))
}

// ---------------------------------------------------------------------------
// Payment cards
// ---------------------------------------------------------------------------

/// GET /api/finances/payment-cards
#[utoipa::path(
    get,
    path = "/api/finances/payment-cards",
    tag = "finances",
    summary = "Saved payment cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<PaymentCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_payment_cards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PaymentCard>>>> {
    let finance = FinanceRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(finance.payment_cards.0 .0)))
}

/// POST /api/finances/payment-cards
///
/// The first saved card, or a card sent with `isDefault`, becomes the only
/// default.
#[utoipa::path(
    post,
    path = "/api/finances/payment-cards",
    tag = "finances",
    summary = "Save a payment card",
    request_body = AddPaymentCardRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<PaymentCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn add_payment_card(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<AddPaymentCardRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentCard>>)> {
    validate_payment_card(&input.last4, &input.brand, input.expiry_month, input.expiry_year)?;

    let finance = FinanceRepo::get_or_create(&state.pool, auth.user_id).await?;
    let mut cards = finance.payment_cards.0;
    let card = cards
        .add(PaymentCard {
            id: Uuid::new_v4().to_string(),
            last4: input.last4,
            brand: input.brand.trim().to_string(),
            expiry_month: input.expiry_month,
            expiry_year: input.expiry_year,
            is_default: input.is_default,
        })
        .clone();
    FinanceRepo::set_payment_cards(&state.pool, auth.user_id, &cards).await?;

    tracing::info!(user_id = auth.user_id, card_id = %card.id, "Payment card added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(card, "Payment card added")),
    ))
}

/// DELETE /api/finances/payment-cards/{card_id}
#[utoipa::path(
    delete,
    path = "/api/finances/payment-cards/{card_id}",
    tag = "finances",
    summary = "Remove a payment card",
    params(("card_id" = String, Path, description = "Card id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_payment_card(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let finance = FinanceRepo::get_or_create(&state.pool, auth.user_id).await?;
    let mut cards = finance.payment_cards.0;
    if !cards.remove(&card_id) {
        return Err(CoreError::not_found("Payment card", &card_id).into());
    }
    FinanceRepo::set_payment_cards(&state.pool, auth.user_id, &cards).await?;
    Ok(Json(MessageResponse::new("Payment card removed")))
}

/// PUT /api/finances/payment-cards/{card_id}/default
#[utoipa::path(
    put,
    path = "/api/finances/payment-cards/{card_id}/default",
    tag = "finances",
    summary = "Make a payment card the default",
    params(("card_id" = String, Path, description = "Card id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<PaymentCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn set_default_payment_card(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<PaymentCard>>>> {
    let finance = FinanceRepo::get_or_create(&state.pool, auth.user_id).await?;
    let mut cards = finance.payment_cards.0;
    if !cards.set_default(&card_id) {
        return Err(CoreError::not_found("Payment card", &card_id).into());
    }
    let updated = FinanceRepo::set_payment_cards(&state.pool, auth.user_id, &cards).await?;
    Ok(Json(ApiResponse::with_message(
        updated.payment_cards.0 .0,
        "Default payment card updated",
    )))
}

// ---------------------------------------------------------------------------
// Physical cards
// ---------------------------------------------------------------------------

/// GET /api/finances/physical-cards
#[utoipa::path(
    get,
    path = "/api/finances/physical-cards",
    tag = "finances",
    summary = "Ordered physical cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<PhysicalCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_physical_cards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PhysicalCard>>>> {
    let cards = PhysicalCardRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(cards)))
}

/// POST /api/finances/physical-cards
#[utoipa::path(
    post,
    path = "/api/finances/physical-cards",
    tag = "finances",
    summary = "Order a physical card",
    request_body = OrderPhysicalCardRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<PhysicalCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn order_physical_card(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<OrderPhysicalCardRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PhysicalCard>>)> {
    let card_type = input.card_type.trim().to_lowercase();
    validate_card_type(&card_type)?;

    let card = PhysicalCardRepo::create(&state.pool, auth.user_id, &card_type).await?;

    tracing::info!(user_id = auth.user_id, card_id = card.id, card_type = %card.card_type, "Physical card ordered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(card, "Physical card ordered")),
    ))
}

/// PUT /api/finances/physical-cards/{id}
#[utoipa::path(
    put,
    path = "/api/finances/physical-cards/{id}",
    tag = "finances",
    summary = "Advance a physical card order",
    request_body = UpdatePhysicalCardRequest,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<PhysicalCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_physical_card(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
    AppJson(input): AppJson<UpdatePhysicalCardRequest>,
) -> AppResult<Json<ApiResponse<PhysicalCard>>> {
    let current = PhysicalCardRepo::find_by_id(&state.pool, card_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Physical card", card_id))?;

    validate_physical_transition(&current.status, &input.status)?;

    let card = PhysicalCardRepo::update_status(
        &state.pool,
        card_id,
        &input.status,
        input.tracking_number.as_deref(),
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Physical card", card_id))?;

    tracing::info!(card_id, status = %card.status, admin_id = admin.user_id, "Physical card status changed");

    Ok(Json(ApiResponse::ok(card)))
}
