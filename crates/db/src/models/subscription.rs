//! Subscription plan catalog and user bindings.

use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `subscriptions` table (a plan in the catalog).
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    #[serde(rename = "interval")]
    pub billing_interval: String,
    #[schema(value_type = Vec<String>)]
    pub features: Json<Vec<String>>,
    pub max_profiles: i32,
    pub max_cards: i32,
    pub custom_domain: bool,
    pub analytics: bool,
    pub priority: i32,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// Plan row with subscriber counts.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub plan: Plan,
    pub active_subscribers: i64,
    pub total_subscribers: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlan {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: Option<String>,
    #[serde(rename = "interval")]
    pub billing_interval: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub max_profiles: Option<i32>,
    pub max_cards: Option<i32>,
    pub custom_domain: Option<bool>,
    pub analytics: Option<bool>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "interval")]
    pub billing_interval: Option<String>,
    pub features: Option<Vec<String>>,
    pub max_profiles: Option<i32>,
    pub max_cards: Option<i32>,
    pub custom_domain: Option<bool>,
    pub analytics: Option<bool>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// A row from the `user_subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    #[schema(value_type = i64)]
    pub subscription_id: DbId,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub start_date: Timestamp,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_date: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub cancelled_at: Option<Timestamp>,
    pub auto_renew: bool,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_payment_date: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub next_payment_date: Option<Timestamp>,
    pub payment_method: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// Binding joined with the user and plan it references.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscriptionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub subscription: UserSubscription,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub plan_name: String,
    pub plan_price: f64,
    pub plan_interval: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserSubscription {
    #[schema(value_type = i64)]
    pub user_id: DbId,
    #[schema(value_type = i64)]
    pub subscription_id: DbId,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub start_date: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_date: Option<Timestamp>,
    pub auto_renew: Option<bool>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub next_payment_date: Option<Timestamp>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserSubscription {
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_date: Option<Timestamp>,
    pub auto_renew: Option<bool>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_payment_date: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub next_payment_date: Option<Timestamp>,
    pub payment_method: Option<String>,
}

/// Active bindings and revenue contribution of one plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRevenue {
    #[schema(value_type = i64)]
    pub plan_id: DbId,
    pub plan_name: String,
    pub active_subscriptions: i64,
    pub monthly_revenue: f64,
}
