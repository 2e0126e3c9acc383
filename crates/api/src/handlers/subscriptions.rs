//! Handlers for the `/subscriptions` resource: the plan catalog, user
//! bindings to plans and recurring revenue figures.
//!
//! Binding changes are mirrored onto the user's finance record so the
//! finances endpoints show the current plan without a join.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use inutile_core::error::CoreError;
use inutile_core::finance::SubscriptionSnapshot;
use inutile_core::slug::validate_slug;
use inutile_core::subscription::{
    arr, monthly_value, mrr, period_end, round_cents, validate_interval, validate_transition,
    STATUS_ACTIVE,
};
use inutile_core::types::DbId;
use inutile_db::models::finance::CreateBill;
use inutile_db::models::subscription::{
    CreatePlan, CreateUserSubscription, Plan, PlanRevenue, PlanWithStats, UpdatePlan,
    UpdateUserSubscription, UserSubscription, UserSubscriptionDetail,
};
use inutile_db::repositories::{
    BillRepo, FinanceRepo, SubscriptionRepo, UserRepo, UserSubscriptionRepo,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Plan with subscriber counts and the revenue it brings in.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    #[serde(flatten)]
    pub plan: PlanWithStats,
    /// Monthly-normalized revenue of the active subscribers.
    pub monthly_revenue: f64,
    /// Plan price times every subscriber, past or present.
    pub total_revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueOverview {
    pub mrr: f64,
    pub arr: f64,
    pub active_subscriptions: i64,
    pub by_plan: Vec<PlanRevenue>,
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// GET /api/subscriptions/plans
#[utoipa::path(
    get,
    path = "/api/subscriptions/plans",
    tag = "subscriptions",
    summary = "Plans on offer",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<Plan>>)
    )
)]
pub async fn list_public_plans(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Plan>>>> {
    let plans = SubscriptionRepo::list_active(&state.pool).await?;
    Ok(Json(ApiResponse::ok(plans)))
}

/// GET /api/subscriptions
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "subscriptions",
    summary = "Plans with subscriber and revenue figures",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<PlanSummary>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_plans(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PlanSummary>>>> {
    let plans = SubscriptionRepo::list_with_stats(&state.pool).await?;
    let summaries = plans
        .into_iter()
        .map(|plan| {
            let unit = monthly_value(plan.plan.price, &plan.plan.billing_interval);
            PlanSummary {
                monthly_revenue: round_cents(unit * plan.active_subscribers as f64),
                total_revenue: round_cents(plan.plan.price * plan.total_subscribers as f64),
                plan,
            }
        })
        .collect();
    Ok(Json(ApiResponse::ok(summaries)))
}

/// GET /api/subscriptions/{id}
#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    summary = "Get a plan",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Plan>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_plan(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Plan>>> {
    let plan = find_plan(&state, plan_id).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// GET /api/subscriptions/{id}/subscribers
#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}/subscribers",
    tag = "subscriptions",
    summary = "Subscribers of a plan",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<UserSubscriptionDetail>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_plan_subscribers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<UserSubscriptionDetail>>>> {
    find_plan(&state, plan_id).await?;
    let subscribers = UserSubscriptionRepo::list_by_plan(&state.pool, plan_id).await?;
    Ok(Json(ApiResponse::ok(subscribers)))
}

/// POST /api/subscriptions
#[utoipa::path(
    post,
    path = "/api/subscriptions",
    tag = "subscriptions",
    summary = "Create a plan",
    request_body = CreatePlan,
    responses(
        (status = 201, description = "Created", body = ApiResponse<Plan>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreatePlan>,
) -> AppResult<(StatusCode, Json<ApiResponse<Plan>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Plan name is required".into()).into());
    }
    input.slug = input.slug.trim().to_lowercase();
    validate_slug(&input.slug).map_err(CoreError::Validation)?;
    validate_price(Some(input.price))?;
    if let Some(interval) = &input.billing_interval {
        validate_interval(interval)?;
    }

    let plan = SubscriptionRepo::create(&state.pool, &input).await?;

    tracing::info!(plan_id = plan.id, slug = %plan.slug, admin_id = admin.user_id, "Plan created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plan))))
}

/// PUT /api/subscriptions/{id}
#[utoipa::path(
    put,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    summary = "Update a plan",
    request_body = UpdatePlan,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Plan>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_plan(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
    AppJson(mut input): AppJson<UpdatePlan>,
) -> AppResult<Json<ApiResponse<Plan>>> {
    if let Some(slug) = input.slug.as_mut() {
        *slug = slug.trim().to_lowercase();
        validate_slug(slug).map_err(CoreError::Validation)?;
    }
    validate_price(input.price)?;
    if let Some(interval) = &input.billing_interval {
        validate_interval(interval)?;
    }

    let plan = SubscriptionRepo::update(&state.pool, plan_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Plan", plan_id))?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// DELETE /api/subscriptions/{id}
///
/// Refused while the plan has active subscribers.
#[utoipa::path(
    delete,
    path = "/api/subscriptions/{id}",
    tag = "subscriptions",
    summary = "Delete a plan without active subscribers",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    find_plan(&state, plan_id).await?;

    let active = UserSubscriptionRepo::count_active_by_plan(&state.pool, plan_id).await?;
    if active > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Plan has {active} active subscriber(s)"
        ))));
    }

    SubscriptionRepo::delete(&state.pool, plan_id).await?;
    tracing::info!(plan_id, admin_id = admin.user_id, "Plan deleted");
    Ok(Json(MessageResponse::new("Plan deleted")))
}

// ---------------------------------------------------------------------------
// User bindings
// ---------------------------------------------------------------------------

/// GET /api/subscriptions/users/all
#[utoipa::path(
    get,
    path = "/api/subscriptions/users/all",
    tag = "subscriptions",
    summary = "Every user subscription",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<UserSubscriptionDetail>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_user_subscriptions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserSubscriptionDetail>>>> {
    let bindings = UserSubscriptionRepo::list_detailed(&state.pool).await?;
    Ok(Json(ApiResponse::ok(bindings)))
}

/// POST /api/subscriptions/users
///
/// Binds a user to an active plan. Paid plans get a pending bill for the
/// first period.
#[utoipa::path(
    post,
    path = "/api/subscriptions/users",
    tag = "subscriptions",
    summary = "Subscribe a user to a plan",
    request_body = CreateUserSubscription,
    responses(
        (status = 201, description = "Created", body = ApiResponse<UserSubscription>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_user_subscription(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateUserSubscription>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserSubscription>>)> {
    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", input.user_id))?;
    let plan = find_plan(&state, input.subscription_id).await?;
    if !plan.is_active {
        return Err(CoreError::Validation("This plan is no longer offered".into()).into());
    }

    let start = input.start_date.unwrap_or_else(Utc::now);
    input.start_date = Some(start);
    if input.end_date.is_none() {
        input.end_date = period_end(start, &plan.billing_interval);
    }
    if input.next_payment_date.is_none() {
        input.next_payment_date = input.end_date;
    }

    let binding = UserSubscriptionRepo::create(&state.pool, &input).await?;
    sync_snapshot(&state, &binding, &plan).await?;

    if plan.price > 0.0 {
        BillRepo::create(
            &state.pool,
            &CreateBill {
                user_id: binding.user_id,
                amount: plan.price,
                currency: Some(plan.currency.clone()),
                description: format!("{} subscription", plan.name),
                status: None,
                invoice_url: None,
            },
        )
        .await?;
    }

    tracing::info!(
        binding_id = binding.id,
        user_id = binding.user_id,
        plan_id = plan.id,
        admin_id = admin.user_id,
        "User subscribed to plan",
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(binding))))
}

/// PUT /api/subscriptions/users/{id}
#[utoipa::path(
    put,
    path = "/api/subscriptions/users/{id}",
    tag = "subscriptions",
    summary = "Update a user subscription",
    request_body = UpdateUserSubscription,
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserSubscription>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_user_subscription(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(binding_id): Path<DbId>,
    AppJson(input): AppJson<UpdateUserSubscription>,
) -> AppResult<Json<ApiResponse<UserSubscription>>> {
    let current = UserSubscriptionRepo::find_by_id(&state.pool, binding_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Subscription", binding_id))?;

    if let Some(status) = &input.status {
        validate_transition(&current.status, status)?;
    }

    let binding = UserSubscriptionRepo::update(&state.pool, binding_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Subscription", binding_id))?;

    if let Some(plan) = SubscriptionRepo::find_by_id(&state.pool, binding.subscription_id).await? {
        sync_snapshot(&state, &binding, &plan).await?;
    }

    tracing::info!(binding_id, status = %binding.status, "User subscription updated");

    Ok(Json(ApiResponse::ok(binding)))
}

/// GET /api/subscriptions/stats/overview
#[utoipa::path(
    get,
    path = "/api/subscriptions/stats/overview",
    tag = "subscriptions",
    summary = "MRR, ARR and per-plan revenue",
    responses(
        (status = 200, description = "Success", body = ApiResponse<RevenueOverview>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_revenue_overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<RevenueOverview>>> {
    let active = UserSubscriptionRepo::list_active_detailed(&state.pool).await?;

    let total_mrr = mrr(
        active
            .iter()
            .map(|b| (b.plan_price, b.plan_interval.as_str())),
    );

    let mut by_plan: BTreeMap<DbId, PlanRevenue> = BTreeMap::new();
    for binding in &active {
        let entry = by_plan
            .entry(binding.subscription.subscription_id)
            .or_insert_with(|| PlanRevenue {
                plan_id: binding.subscription.subscription_id,
                plan_name: binding.plan_name.clone(),
                active_subscriptions: 0,
                monthly_revenue: 0.0,
            });
        entry.active_subscriptions += 1;
        entry.monthly_revenue += monthly_value(binding.plan_price, &binding.plan_interval);
    }
    let by_plan = by_plan
        .into_values()
        .map(|mut p| {
            p.monthly_revenue = round_cents(p.monthly_revenue);
            p
        })
        .collect();

    Ok(Json(ApiResponse::ok(RevenueOverview {
        mrr: round_cents(total_mrr),
        arr: round_cents(arr(total_mrr)),
        active_subscriptions: active.len() as i64,
        by_plan,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_plan(state: &AppState, plan_id: DbId) -> AppResult<Plan> {
    SubscriptionRepo::find_by_id(&state.pool, plan_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Plan", plan_id).into())
}

/// Mirror a binding onto the user's finance record.
async fn sync_snapshot(
    state: &AppState,
    binding: &UserSubscription,
    plan: &Plan,
) -> AppResult<()> {
    let snapshot = SubscriptionSnapshot {
        plan: plan.name.clone(),
        status: binding.status.clone(),
        current_period_start: binding.start_date,
        current_period_end: binding
            .end_date
            .or_else(|| period_end(binding.start_date, &plan.billing_interval)),
        cancel_at_period_end: binding.status == STATUS_ACTIVE && !binding.auto_renew,
    };
    FinanceRepo::set_subscription(&state.pool, binding.user_id, &snapshot).await?;
    Ok(())
}

fn validate_price(price: Option<f64>) -> AppResult<()> {
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        return Err(CoreError::Validation("Price must be a non-negative amount".into()).into());
    }
    Ok(())
}
