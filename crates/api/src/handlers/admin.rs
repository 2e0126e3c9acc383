//! Handlers for the `/admin` back office: dashboard stats, orders, the
//! product catalog, users, profiles and physical client cards.
//!
//! All endpoints require the admin role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use inutile_core::card;
use inutile_core::error::CoreError;
use inutile_core::order;
use inutile_core::roles::validate_role;
use inutile_core::types::DbId;
use inutile_db::models::client_card::{ClientCard, CreateClientCard, UpdateClientCard};
use inutile_db::models::order::{CreateOrder, Order};
use inutile_db::models::product_card::{CreateProductCard, ProductCard, UpdateProductCard};
use inutile_db::models::profile::{Profile, ProfileSummary};
use inutile_db::models::user::{UpdateUser, UserResponse};
use inutile_db::repositories::{ClientCardRepo, OrderRepo, ProductCardRepo, ProfileRepo, UserRepo};
use inutile_events::Notification;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::handlers::profiles::{build_update, UpdateProfileRequest};
use crate::handlers::users;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PageParams, ThresholdParams};
use crate::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::state::AppState;

/// Active products with fewer units than this are reported as low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub pending_orders: i64,
    pub total_revenue: f64,
    pub active_users: i64,
    pub low_stock: usize,
    pub low_stock_products: Vec<ProductCard>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCardStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/admin/stats
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    summary = "Dashboard counters",
    responses(
        (status = 200, description = "Success", body = ApiResponse<AdminStats>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    let pending_orders = OrderRepo::count_by_status(&state.pool, order::STATUS_PENDING).await?;
    let total_revenue = OrderRepo::completed_revenue(&state.pool).await?;
    let active_users = UserRepo::count_active(&state.pool).await?;
    let low_stock_products =
        ProductCardRepo::low_stock(&state.pool, LOW_STOCK_THRESHOLD as i32).await?;

    Ok(Json(ApiResponse::ok(AdminStats {
        pending_orders,
        total_revenue,
        active_users,
        low_stock: low_stock_products.len(),
        low_stock_products,
    })))
}

/// GET /api/admin/products/low-stock?threshold=N
#[utoipa::path(
    get,
    path = "/api/admin/products/low-stock",
    tag = "admin",
    summary = "Active products below a stock threshold",
    params(ThresholdParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ProductCard>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_low_stock(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ThresholdParams>,
) -> AppResult<Json<ApiResponse<Vec<ProductCard>>>> {
    let threshold = params.threshold.unwrap_or(LOW_STOCK_THRESHOLD);
    if threshold < 0 {
        return Err(AppError::BadRequest("threshold must not be negative".into()));
    }
    let threshold = i32::try_from(threshold).unwrap_or(i32::MAX);
    let products = ProductCardRepo::low_stock(&state.pool, threshold).await?;
    Ok(Json(ApiResponse::ok(products)))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// GET /api/admin/orders
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "admin",
    summary = "List orders",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<Order>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/admin/orders/{id}
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    tag = "admin",
    summary = "Get an order",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Order>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_order(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", order_id))?;
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/admin/orders
#[utoipa::path(
    post,
    path = "/api/admin/orders",
    tag = "admin",
    summary = "Create an order",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Order>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_order(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateOrder>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    if input.customer_name.trim().is_empty() {
        return Err(CoreError::Validation("Customer name is required".into()).into());
    }
    if !input.email.contains('@') {
        return Err(CoreError::Validation("Invalid email address".into()).into());
    }
    order::validate_total(input.total).map_err(CoreError::Validation)?;

    let order = OrderRepo::create(&state.pool, &input).await?;

    tracing::info!(order_id = order.id, admin_id = admin.user_id, "Order created");

    state.mailer.dispatch(
        order.email.clone(),
        Notification::OrderConfirmation {
            customer_name: order.customer_name.clone(),
            order_id: order.id,
            total: order.total,
        },
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// PUT /api/admin/orders/{id}/status
///
/// Moving to `processing` emails a shipping notice, moving to `completed`
/// emails a delivery notice.
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    tag = "admin",
    summary = "Change order status",
    request_body = UpdateOrderStatusRequest,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Order>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    AppJson(input): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let current = OrderRepo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", order_id))?;

    order::validate_transition(&current.status, &input.status)?;

    let updated = OrderRepo::update_status(
        &state.pool,
        order_id,
        &input.status,
        input.tracking_number.as_deref(),
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Order", order_id))?;

    tracing::info!(
        order_id,
        from = %current.status,
        to = %updated.status,
        admin_id = admin.user_id,
        "Order status changed",
    );

    let notification = match updated.status.as_str() {
        order::STATUS_PROCESSING => Some(Notification::OrderShipped {
            customer_name: updated.customer_name.clone(),
            order_id: updated.id,
            tracking_number: updated.tracking_number.clone(),
        }),
        order::STATUS_COMPLETED => Some(Notification::OrderDelivered {
            customer_name: updated.customer_name.clone(),
            order_id: updated.id,
        }),
        _ => None,
    };
    if let Some(notification) = notification.filter(|_| !updated.email.is_empty()) {
        state.mailer.dispatch(updated.email.clone(), notification);
    }

    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/admin/orders/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    tag = "admin",
    summary = "Delete an order",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_order(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !OrderRepo::delete(&state.pool, order_id).await? {
        return Err(CoreError::not_found("Order", order_id).into());
    }
    tracing::info!(order_id, admin_id = admin.user_id, "Order deleted");
    Ok(Json(MessageResponse::new("Order deleted")))
}

// ---------------------------------------------------------------------------
// Product catalog
// ---------------------------------------------------------------------------

/// GET /api/admin/products
#[utoipa::path(
    get,
    path = "/api/admin/products",
    tag = "admin",
    summary = "List products",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ProductCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_products(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ProductCard>>>> {
    let products = ProductCardRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// POST /api/admin/products
#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "admin",
    summary = "Create a product",
    request_body = CreateProductCard,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ProductCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProductCard>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductCard>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Product name is required".into()).into());
    }
    validate_product_numbers(Some(input.price), Some(input.stock))?;

    let product = ProductCardRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// PUT /api/admin/products/{id}
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "admin",
    summary = "Update a product",
    request_body = UpdateProductCard,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ProductCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    AppJson(input): AppJson<UpdateProductCard>,
) -> AppResult<Json<ApiResponse<ProductCard>>> {
    validate_product_numbers(input.price, input.stock)?;

    let product = ProductCardRepo::update(&state.pool, product_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", product_id))?;
    Ok(Json(ApiResponse::ok(product)))
}

/// PATCH /api/admin/products/{id}/toggle
#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/toggle",
    tag = "admin",
    summary = "Toggle product availability",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ProductCard>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn toggle_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProductCard>>> {
    let product = ProductCardRepo::toggle_active(&state.pool, product_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", product_id))?;
    Ok(Json(ApiResponse::ok(product)))
}

/// DELETE /api/admin/products/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "admin",
    summary = "Delete a product",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ProductCardRepo::delete(&state.pool, product_id).await? {
        return Err(CoreError::not_found("Product", product_id).into());
    }
    Ok(Json(MessageResponse::new("Product deleted")))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/admin/users
///
/// The `/api/users` listing, mounted under the dashboard prefix.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    summary = "List users",
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
    admin: RequireAdmin,
    state: State<AppState>,
    query: Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    users::list_users(admin, state, query).await
}

/// PUT /api/admin/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    tag = "admin",
    summary = "Change a user's role",
    request_body = UpdateRoleRequest,
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
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    AppJson(input): AppJson<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    validate_role(&input.role).map_err(CoreError::Validation)?;

    let user = UserRepo::update_role(&state.pool, user_id, &input.role)
        .await?
        .ok_or_else(|| CoreError::not_found("User", user_id))?;

    tracing::info!(user_id, role = %user.role, admin_id = admin.user_id, "User role changed");

    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/admin/users/{id}
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "admin",
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

/// DELETE /api/admin/users/{id}
///
/// Hard delete. The user's profile and finance rows go with it.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    summary = "Delete a user and their profile",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if user_id == admin.user_id {
        return Err(CoreError::Validation("You cannot delete your own account".into()).into());
    }
    if !UserRepo::delete(&state.pool, user_id).await? {
        return Err(CoreError::not_found("User", user_id).into());
    }
    tracing::info!(user_id, admin_id = admin.user_id, "User deleted");
    Ok(Json(MessageResponse::new("User and profile deleted")))
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/admin/profiles
#[utoipa::path(
    get,
    path = "/api/admin/profiles",
    tag = "admin",
    summary = "List profiles",
    params(PageParams),
    responses(
        (status = 200, description = "Success", body = PaginatedResponse<ProfileSummary>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<ProfileSummary>>> {
    let (page, limit) = params.resolve_default();
    let offset = inutile_core::pagination::offset(page, limit);
    let profiles = ProfileRepo::list_summaries(&state.pool, limit, offset).await?;
    let total = ProfileRepo::count(&state.pool).await?;
    Ok(Json(PaginatedResponse::new(profiles, page, limit, total)))
}

/// PATCH /api/admin/profiles/{id}/toggle-public
#[utoipa::path(
    patch,
    path = "/api/admin/profiles/{id}/toggle-public",
    tag = "admin",
    summary = "Toggle profile visibility",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn toggle_profile_public(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = ProfileRepo::toggle_public(&state.pool, profile_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/admin/profiles/{id}
#[utoipa::path(
    put,
    path = "/api/admin/profiles/{id}",
    tag = "admin",
    summary = "Update a profile",
    request_body = UpdateProfileRequest,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_profile(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let current = ProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
    let update = build_update(&current, input)?;
    let profile = ProfileRepo::update(&state.pool, profile_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// DELETE /api/admin/profiles/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/profiles/{id}",
    tag = "admin",
    summary = "Delete a profile",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_profile(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ProfileRepo::delete(&state.pool, profile_id).await? {
        return Err(CoreError::not_found("Profile", profile_id).into());
    }
    Ok(Json(MessageResponse::new("Profile deleted")))
}

// ---------------------------------------------------------------------------
// Client cards
// ---------------------------------------------------------------------------

/// GET /api/admin/client-cards
#[utoipa::path(
    get,
    path = "/api/admin/client-cards",
    tag = "admin",
    summary = "List client cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ClientCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_client_cards(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ClientCard>>>> {
    let cards = ClientCardRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(cards)))
}

/// GET /api/admin/client-cards/{id}
#[utoipa::path(
    get,
    path = "/api/admin/client-cards/{id}",
    tag = "admin",
    summary = "Get a client card",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_client_card(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    let card = find_client_card(&state, card_id).await?;
    Ok(Json(ApiResponse::ok(card)))
}

/// GET /api/admin/client-cards/serial/{serial}
#[utoipa::path(
    get,
    path = "/api/admin/client-cards/serial/{serial}",
    tag = "admin",
    summary = "Find a card by serial",
    params(("serial" = String, Path, description = "Card serial number")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_client_card_by_serial(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    let card = ClientCardRepo::find_by_serial(&state.pool, &serial)
        .await?
        .ok_or_else(|| CoreError::not_found("Card", card::normalize_serial(&serial)))?;
    Ok(Json(ApiResponse::ok(card)))
}

/// GET /api/admin/client-cards/order/{order_id}
#[utoipa::path(
    get,
    path = "/api/admin/client-cards/order/{order_id}",
    tag = "admin",
    summary = "Cards of an order",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ClientCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_client_cards_by_order(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ClientCard>>>> {
    let cards = ClientCardRepo::list_by_order(&state.pool, order_id).await?;
    Ok(Json(ApiResponse::ok(cards)))
}

/// POST /api/admin/client-cards
///
/// The serial number is stored uppercased; a duplicate serial is a conflict.
#[utoipa::path(
    post,
    path = "/api/admin/client-cards",
    tag = "admin",
    summary = "Create a client card",
    request_body = CreateClientCard,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ClientCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_client_card(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateClientCard>,
) -> AppResult<(StatusCode, Json<ApiResponse<ClientCard>>)> {
    card::validate_serial(&input.serial_number)?;
    input.serial_number = card::normalize_serial(&input.serial_number);

    if ClientCardRepo::find_by_serial(&state.pool, &input.serial_number)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A card with serial number {} already exists",
            input.serial_number
        ))));
    }

    let card = ClientCardRepo::create(&state.pool, &input).await?;

    tracing::info!(card_id = card.id, serial = %card.serial_number, admin_id = admin.user_id, "Client card created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(card))))
}

/// PUT /api/admin/client-cards/{id}/status
#[utoipa::path(
    put,
    path = "/api/admin/client-cards/{id}/status",
    tag = "admin",
    summary = "Change card status",
    request_body = UpdateCardStatusRequest,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_client_card_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
    AppJson(input): AppJson<UpdateCardStatusRequest>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    let card = change_card_status(&state, card_id, &input.status).await?;
    tracing::info!(card_id, status = %card.status, admin_id = admin.user_id, "Client card status changed");
    Ok(Json(ApiResponse::ok(card)))
}

/// PUT /api/admin/client-cards/{id}
///
/// Updates tracking and shipping details, and the status when one is given.
#[utoipa::path(
    put,
    path = "/api/admin/client-cards/{id}",
    tag = "admin",
    summary = "Update tracking, shipping or status",
    request_body = UpdateClientCard,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_client_card(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
    AppJson(mut input): AppJson<UpdateClientCard>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    let current = find_client_card(&state, card_id).await?;

    input.status = input.status.filter(|s| *s != current.status);
    if let Some(status) = input.status.as_deref() {
        card::validate_transition(&current.status, status)?;
    }

    let card = ClientCardRepo::update(&state.pool, card_id, &input, &current.status)
        .await?
        .ok_or_else(|| CoreError::Conflict("Card was modified concurrently, retry".into()))?;

    Ok(Json(ApiResponse::ok(card)))
}

/// DELETE /api/admin/client-cards/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/client-cards/{id}",
    tag = "admin",
    summary = "Delete a client card",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_client_card(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ClientCardRepo::delete(&state.pool, card_id).await? {
        return Err(CoreError::not_found("Card", card_id).into());
    }
    tracing::info!(card_id, admin_id = admin.user_id, "Client card deleted");
    Ok(Json(MessageResponse::new("Card deleted")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_client_card(state: &AppState, card_id: DbId) -> AppResult<ClientCard> {
    ClientCardRepo::find_by_id(&state.pool, card_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Card", card_id).into())
}

async fn change_card_status(state: &AppState, card_id: DbId, status: &str) -> AppResult<ClientCard> {
    let current = find_client_card(state, card_id).await?;
    card::validate_transition(&current.status, status)?;
    ClientCardRepo::update_status(&state.pool, card_id, status)
        .await?
        .ok_or_else(|| CoreError::not_found("Card", card_id).into())
}

fn validate_product_numbers(price: Option<f64>, stock: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(CoreError::Validation("Price must be a non-negative amount".into()).into());
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(CoreError::Validation("Stock must not be negative".into()).into());
    }
    Ok(())
}
