//! Handlers for the `/cards` resource: public lookups, activation, scans and
//! the owner's scan analytics.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Path, State};
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use inutile_core::analytics::SCAN_HISTORY_DAYS;
use inutile_core::card::{normalize_serial, validate_serial, STATUS_ACTIVATED};
use inutile_core::error::CoreError;
use inutile_core::types::DbId;
use inutile_core::user_agent::{classify_browser, classify_device, client_ip};
use inutile_db::models::card_scan::{CardScan, CreateCardScan, DateCount, LabelCount, SerialCount};
use inutile_db::models::client_card::ClientCard;
use inutile_db::repositories::{CardScanRepo, ClientCardRepo, ProfileRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivateCardRequest {
    pub serial_number: String,
    #[schema(value_type = Option<i64>)]
    pub profile_id: Option<DbId>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub serial_number: String,
    pub city: Option<String>,
}

/// Returned by `GET /cards/setup/{serial}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardSetup {
    pub serial_number: String,
    pub status: String,
    pub is_activated: bool,
    pub card_type: Option<String>,
    pub design: Option<String>,
}

/// Returned by `GET /cards/redirect/{serial}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardRedirect {
    pub is_activated: bool,
    pub profile_slug: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserScanAnalytics {
    pub total_scans: i64,
    pub scans_by_card: Vec<SerialCount>,
    pub scans_by_date: Vec<DateCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardScanAnalytics {
    pub total_scans: i64,
    pub scans_by_date: Vec<DateCount>,
    pub scans_by_device: Vec<LabelCount>,
}

/// Request metadata recorded with a scan.
///
/// The client IP comes from the first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the socket peer address when the server was started
/// with connect info.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientMeta {
            ip_address: client_ip(
                header_str(headers, "x-forwarded-for"),
                header_str(headers, "x-real-ip"),
                peer,
            ),
            user_agent: header_str(headers, USER_AGENT.as_str()).map(str::to_string),
            referer: header_str(headers, REFERER.as_str()).map(str::to_string),
            country: header_str(headers, "cf-ipcountry")
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty()),
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// ---------------------------------------------------------------------------
// Public lookups
// ---------------------------------------------------------------------------

/// GET /api/cards/setup/{serial}
#[utoipa::path(
    get,
    path = "/api/cards/setup/{serial}",
    tag = "cards",
    summary = "Card setup status",
    params(("serial" = String, Path, description = "Card serial number")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<CardSetup>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_card_setup(
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> AppResult<Json<ApiResponse<CardSetup>>> {
    let card = find_card(&state, &serial).await?;

    Ok(Json(ApiResponse::ok(CardSetup {
        is_activated: card.status == STATUS_ACTIVATED,
        serial_number: card.serial_number,
        status: card.status,
        card_type: card.card_type,
        design: card.design,
    })))
}

/// GET /api/cards/redirect/{serial}
///
/// Tells the scan landing page where to send the visitor.
#[utoipa::path(
    get,
    path = "/api/cards/redirect/{serial}",
    tag = "cards",
    summary = "Where a scan should land",
    params(("serial" = String, Path, description = "Card serial number")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<CardRedirect>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_card_redirect(
    State(state): State<AppState>,
    Path(serial): Path<String>,
) -> AppResult<Json<ApiResponse<CardRedirect>>> {
    let card = find_card(&state, &serial).await?;
    let is_activated = card.status == STATUS_ACTIVATED;

    let profile_slug = match card.profile_id {
        Some(profile_id) if is_activated => ProfileRepo::find_by_id(&state.pool, profile_id)
            .await?
            .map(|p| p.slug),
        _ => None,
    };

    Ok(Json(ApiResponse::ok(CardRedirect {
        is_activated,
        profile_slug,
    })))
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// POST /api/cards/activate
///
/// Binds an unactivated card to the caller and one of their profiles. The
/// binding happens in a single conditional update, so of two concurrent
/// activations exactly one succeeds.
#[utoipa::path(
    post,
    path = "/api/cards/activate",
    tag = "cards",
    summary = "Activate a card",
    request_body = ActivateCardRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<ClientCard>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn activate_card(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ActivateCardRequest>,
) -> AppResult<Json<ApiResponse<ClientCard>>> {
    validate_serial(&input.serial_number)?;
    let serial = normalize_serial(&input.serial_number);

    let profile = match input.profile_id {
        Some(profile_id) => {
            let profile = ProfileRepo::find_by_id(&state.pool, profile_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;
            if profile.user_id != auth.user_id {
                return Err(AppError::Core(CoreError::Forbidden(
                    "This profile does not belong to you".into(),
                )));
            }
            profile
        }
        None => ProfileRepo::find_by_user_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Profile", auth.user_id))?,
    };

    let Some(card) = ClientCardRepo::activate(&state.pool, &serial, auth.user_id, profile.id).await?
    else {
        return Err(match ClientCardRepo::find_by_serial(&state.pool, &serial).await? {
            None => CoreError::not_found("Card", &serial).into(),
            Some(_) => CoreError::AlreadyActivated(serial).into(),
        });
    };

    tracing::info!(
        card_id = card.id,
        serial = %card.serial_number,
        user_id = auth.user_id,
        profile_id = profile.id,
        "Card activated",
    );

    Ok(Json(ApiResponse::with_message(card, "Card activated")))
}

/// GET /api/cards/my-cards
#[utoipa::path(
    get,
    path = "/api/cards/my-cards",
    tag = "cards",
    summary = "Own cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ClientCard>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_my_cards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ClientCard>>>> {
    let cards = ClientCardRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(cards)))
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// POST /api/cards/scan
///
/// Appends a row to the scan ledger, attributed to the card's current owner.
#[utoipa::path(
    post,
    path = "/api/cards/scan",
    tag = "cards",
    summary = "Record a card scan",
    request_body = ScanRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<CardScan>),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn record_scan(
    State(state): State<AppState>,
    meta: ClientMeta,
    AppJson(input): AppJson<ScanRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CardScan>>)> {
    let card = find_card(&state, &input.serial_number).await?;

    let scan = CardScanRepo::create(
        &state.pool,
        &CreateCardScan {
            card_id: card.id,
            serial_number: card.serial_number,
            user_id: card.user_id,
            device: classify_device(meta.user_agent.as_deref()).to_string(),
            browser: classify_browser(meta.user_agent.as_deref()).to_string(),
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            referer: meta.referer,
            country: meta.country,
            city: input.city.filter(|c| !c.trim().is_empty()),
        },
    )
    .await?;

    tracing::debug!(card_id = scan.card_id, device = %scan.device, "Card scanned");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(scan))))
}

/// GET /api/cards/analytics
#[utoipa::path(
    get,
    path = "/api/cards/analytics",
    tag = "cards",
    summary = "Scan analytics over own cards",
    responses(
        (status = 200, description = "Success", body = ApiResponse<UserScanAnalytics>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_my_scan_analytics(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UserScanAnalytics>>> {
    let total_scans = CardScanRepo::count_by_user(&state.pool, auth.user_id).await?;
    let scans_by_card = CardScanRepo::by_card_for_user(&state.pool, auth.user_id).await?;
    let scans_by_date =
        CardScanRepo::by_date_for_user(&state.pool, auth.user_id, SCAN_HISTORY_DAYS).await?;

    Ok(Json(ApiResponse::ok(UserScanAnalytics {
        total_scans,
        scans_by_card,
        scans_by_date,
    })))
}

/// GET /api/cards/analytics/{card_id}
///
/// Only the card's owner may read its analytics.
#[utoipa::path(
    get,
    path = "/api/cards/analytics/{card_id}",
    tag = "cards",
    summary = "Scan analytics of one owned card",
    params(("card_id" = i64, Path, description = "Card id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<CardScanAnalytics>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_card_scan_analytics(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(card_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CardScanAnalytics>>> {
    let card = ClientCardRepo::find_by_id(&state.pool, card_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Card", card_id))?;

    if card.user_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this card".into(),
        )));
    }

    let total_scans = CardScanRepo::count_by_card(&state.pool, card.id).await?;
    let scans_by_date =
        CardScanRepo::by_date_for_card(&state.pool, card.id, SCAN_HISTORY_DAYS).await?;
    let scans_by_device = CardScanRepo::by_device_for_card(&state.pool, card.id).await?;

    Ok(Json(ApiResponse::ok(CardScanAnalytics {
        total_scans,
        scans_by_date,
        scans_by_device,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_card(state: &AppState, serial: &str) -> AppResult<ClientCard> {
    validate_serial(serial)?;
    ClientCardRepo::find_by_serial(&state.pool, serial)
        .await?
        .ok_or_else(|| CoreError::not_found("Card", normalize_serial(serial)).into())
}
