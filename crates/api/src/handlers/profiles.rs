//! Handlers for the `/profiles` resource: the public link page and the
//! owner's editing endpoints.
//!
//! The link list is read, changed in memory with the helpers from
//! `inutile_core::profile`, then written back as a whole.

use axum::extract::{Path, State};
use axum::Json;
use inutile_core::error::CoreError;
use inutile_core::profile::{
    add_link, normalize_links, public_links, public_social_links, remove_link, reorder_links,
    update_link, validate_theme, LinkInput, LinkPatch, ProfileLink, SocialLink, Theme,
    ThemePatch, MAX_BIO_LENGTH,
};
use inutile_core::roles::ROLE_ADMIN;
use inutile_core::slug::validate_slug;
use inutile_core::types::DbId;
use inutile_db::models::profile::{Profile, UpdateProfile};
use inutile_db::repositories::{ProfileRepo, UserRepo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Partial profile update. Absent fields are left unchanged; `theme` is
/// merged field by field into the current theme.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Option<Vec<LinkInput>>,
    pub social_links: Option<Vec<SocialLink>>,
    pub theme: Option<ThemePatch>,
    pub is_public: Option<bool>,
    #[schema(value_type = Option<i64>)]
    pub template_id: Option<DbId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSlugRequest {
    pub slug: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderLinksRequest {
    pub link_ids: Vec<String>,
}

/// What visitors of `/p/{slug}` see.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub slug: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Vec<ProfileLink>,
    pub social_links: Vec<SocialLink>,
    pub theme: Theme,
    /// Whether the owner is a platform admin.
    pub is_admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlugAvailability {
    pub available: bool,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/profiles/public/{slug}
#[utoipa::path(
    get,
    path = "/api/profiles/public/{slug}",
    tag = "profiles",
    summary = "Public link page",
    params(("slug" = String, Path, description = "Profile slug")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<PublicProfile>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<PublicProfile>>> {
    let profile = ProfileRepo::find_by_slug(&state.pool, slug.trim())
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", &slug))?;

    if !profile.is_public {
        return Err(AppError::Core(CoreError::Forbidden(
            "This profile is private".into(),
        )));
    }

    let is_admin = UserRepo::find_by_id(&state.pool, profile.user_id)
        .await?
        .is_some_and(|owner| owner.role == ROLE_ADMIN);

    Ok(Json(ApiResponse::ok(PublicProfile {
        id: profile.id,
        links: public_links(&profile.links),
        social_links: public_social_links(&profile.social_links),
        theme: profile.theme.0,
        slug: profile.slug,
        display_name: profile.display_name,
        bio: profile.bio,
        avatar_url: profile.avatar_url,
        email: profile.email,
        phone: profile.phone,
        is_admin,
    })))
}

/// GET /api/profiles/check-slug/{slug}
///
/// A malformed slug is reported as unavailable rather than as an error.
#[utoipa::path(
    get,
    path = "/api/profiles/check-slug/{slug}",
    tag = "profiles",
    summary = "Slug availability",
    params(("slug" = String, Path, description = "Profile slug")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<SlugAvailability>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn check_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<SlugAvailability>>> {
    let slug = slug.trim().to_lowercase();
    let available = match validate_slug(&slug) {
        Ok(()) => !ProfileRepo::slug_taken(&state.pool, &slug, None).await?,
        Err(_) => false,
    };
    Ok(Json(ApiResponse::ok(SlugAvailability { available, slug })))
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// GET /api/profiles/me
#[utoipa::path(
    get,
    path = "/api/profiles/me",
    tag = "profiles",
    summary = "Own profile",
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = own_profile(&state, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/profiles/me
#[utoipa::path(
    put,
    path = "/api/profiles/me",
    tag = "profiles",
    summary = "Update own profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = own_profile(&state, auth.user_id).await?;
    let update = build_update(&profile, input)?;

    let updated = ProfileRepo::update(&state.pool, profile.id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile.id))?;

    tracing::info!(profile_id = updated.id, user_id = auth.user_id, "Profile updated");

    Ok(Json(ApiResponse::with_message(updated, "Profile updated")))
}

/// PUT /api/profiles/me/slug
#[utoipa::path(
    put,
    path = "/api/profiles/me/slug",
    tag = "profiles",
    summary = "Change own slug",
    request_body = UpdateSlugRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_my_slug(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateSlugRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let slug = input.slug.trim().to_lowercase();
    validate_slug(&slug).map_err(CoreError::Validation)?;

    let profile = own_profile(&state, auth.user_id).await?;
    if profile.slug == slug {
        return Ok(Json(ApiResponse::ok(profile)));
    }
    if ProfileRepo::slug_taken(&state.pool, &slug, Some(profile.id)).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Slug '{slug}' is already taken"
        ))));
    }

    let updated = ProfileRepo::update_slug(&state.pool, profile.id, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile.id))?;

    tracing::info!(profile_id = updated.id, slug = %updated.slug, "Profile slug changed");

    Ok(Json(ApiResponse::with_message(updated, "Slug updated")))
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// POST /api/profiles/me/links
#[utoipa::path(
    post,
    path = "/api/profiles/me/links",
    tag = "profiles",
    summary = "Add a link",
    request_body = LinkInput,
    responses(
        (status = 200, description = "Success", body = ApiResponse<ProfileLink>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn add_my_link(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<LinkInput>,
) -> AppResult<Json<ApiResponse<ProfileLink>>> {
    validate_link_fields(Some(&input.title), Some(&input.url))?;

    let profile = own_profile(&state, auth.user_id).await?;
    let mut links = profile.links.0;
    let link = add_link(&mut links, input);
    ProfileRepo::set_links(&state.pool, profile.id, &links).await?;

    Ok(Json(ApiResponse::with_message(link, "Link added")))
}

/// PUT /api/profiles/me/links/{link_id}
#[utoipa::path(
    put,
    path = "/api/profiles/me/links/{link_id}",
    tag = "profiles",
    summary = "Update a link",
    request_body = LinkPatch,
    params(("link_id" = String, Path, description = "Link id")),
    responses(
        (status = 200, description = "Success", body = ApiResponse<ProfileLink>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_my_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    AppJson(input): AppJson<LinkPatch>,
) -> AppResult<Json<ApiResponse<ProfileLink>>> {
    validate_link_fields(input.title.as_deref(), input.url.as_deref())?;

    let profile = own_profile(&state, auth.user_id).await?;
    let mut links = profile.links.0;
    let link = update_link(&mut links, &link_id, input)
        .ok_or_else(|| CoreError::not_found("Link", &link_id))?;
    ProfileRepo::set_links(&state.pool, profile.id, &links).await?;

    Ok(Json(ApiResponse::with_message(link, "Link updated")))
}

/// DELETE /api/profiles/me/links/{link_id}
#[utoipa::path(
    delete,
    path = "/api/profiles/me/links/{link_id}",
    tag = "profiles",
    summary = "Delete a link",
    params(("link_id" = String, Path, description = "Link id")),
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_my_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let profile = own_profile(&state, auth.user_id).await?;
    let mut links = profile.links.0;
    if !remove_link(&mut links, &link_id) {
        return Err(CoreError::not_found("Link", &link_id).into());
    }
    ProfileRepo::set_links(&state.pool, profile.id, &links).await?;

    Ok(Json(MessageResponse::new("Link deleted")))
}

/// PUT /api/profiles/me/links/reorder
///
/// The submitted id list becomes the complete link list: links it omits are
/// removed and unknown ids are ignored.
#[utoipa::path(
    put,
    path = "/api/profiles/me/links/reorder",
    tag = "profiles",
    summary = "Reorder links; omitted links are removed",
    request_body = ReorderLinksRequest,
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ProfileLink>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn reorder_my_links(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ReorderLinksRequest>,
) -> AppResult<Json<ApiResponse<Vec<ProfileLink>>>> {
    let profile = own_profile(&state, auth.user_id).await?;
    let links = reorder_links(profile.links.0, &input.link_ids);
    let updated = ProfileRepo::set_links(&state.pool, profile.id, &links)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile.id))?;

    Ok(Json(ApiResponse::with_message(updated.links.0, "Links reordered")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn own_profile(state: &AppState, user_id: DbId) -> AppResult<Profile> {
    ProfileRepo::find_by_user_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", user_id).into())
}

/// Turn a patch request into a repository update, merging the theme and
/// assigning ids to new links.
pub(crate) fn build_update(
    current: &Profile,
    input: UpdateProfileRequest,
) -> AppResult<UpdateProfile> {
    if let Some(name) = &input.display_name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Display name cannot be empty".into()).into());
        }
    }
    if let Some(bio) = &input.bio {
        if bio.chars().count() as u64 > MAX_BIO_LENGTH {
            return Err(CoreError::Validation(format!(
                "Bio must be at most {MAX_BIO_LENGTH} characters"
            ))
            .into());
        }
    }
    if let Some(links) = &input.links {
        for link in links {
            validate_link_fields(Some(&link.title), Some(&link.url))?;
        }
    }

    let theme = match input.theme {
        Some(patch) => {
            let mut theme = current.theme.0.clone();
            theme.merge(patch);
            validate_theme(&theme).map_err(CoreError::Validation)?;
            Some(theme)
        }
        None => None,
    };

    Ok(UpdateProfile {
        display_name: input.display_name.map(|n| n.trim().to_string()),
        bio: input.bio,
        avatar_url: input.avatar_url,
        email: input.email,
        phone: input.phone,
        links: input.links.map(normalize_links),
        social_links: input.social_links,
        theme,
        is_public: input.is_public,
        template_id: input.template_id,
    })
}

fn validate_link_fields(title: Option<&str>, url: Option<&str>) -> AppResult<()> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(CoreError::Validation("Link title is required".into()).into());
    }
    if url.is_some_and(|u| u.trim().is_empty()) {
        return Err(CoreError::Validation("Link URL is required".into()).into());
    }
    Ok(())
}
