//! Profile page value types: links, social links and theme.
//!
//! Links are stored as an ordered list on the profile row. The helpers here
//! implement every link mutation so that id assignment and ordering rules live
//! in one place.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length of a profile bio.
pub const MAX_BIO_LENGTH: u64 = 500;

pub const BUTTON_STYLE_ROUNDED: &str = "rounded";
pub const BUTTON_STYLE_SQUARE: &str = "square";
pub const BUTTON_STYLE_PILL: &str = "pill";

pub const VALID_BUTTON_STYLES: &[&str] = &[BUTTON_STYLE_ROUNDED, BUTTON_STYLE_SQUARE, BUTTON_STYLE_PILL];

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Visual theme of a profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub button_style: String,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_block_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_font_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio_font_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_font_size: Option<i32>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: "#0a0a0a".to_string(),
            text_color: "#ffffff".to_string(),
            button_color: "#d4af37".to_string(),
            button_text_color: "#0a0a0a".to_string(),
            button_style: BUTTON_STYLE_ROUNDED.to_string(),
            font_family: "Inter".to_string(),
            link_block_color: None,
            name_font_size: None,
            bio_font_size: None,
            link_font_size: None,
        }
    }
}

/// Partial theme update; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
    pub button_style: Option<String>,
    pub font_family: Option<String>,
    pub link_block_color: Option<String>,
    pub name_font_size: Option<i32>,
    pub bio_font_size: Option<i32>,
    pub link_font_size: Option<i32>,
}

impl Theme {
    /// Apply a partial update field by field.
    pub fn merge(&mut self, patch: ThemePatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut self.background_color, patch.background_color);
        set(&mut self.text_color, patch.text_color);
        set(&mut self.button_color, patch.button_color);
        set(&mut self.button_text_color, patch.button_text_color);
        set(&mut self.button_style, patch.button_style);
        set(&mut self.font_family, patch.font_family);
        if patch.link_block_color.is_some() {
            self.link_block_color = patch.link_block_color;
        }
        if patch.name_font_size.is_some() {
            self.name_font_size = patch.name_font_size;
        }
        if patch.bio_font_size.is_some() {
            self.bio_font_size = patch.bio_font_size;
        }
        if patch.link_font_size.is_some() {
            self.link_font_size = patch.link_font_size;
        }
    }
}

/// Validate a theme's enumerated fields.
pub fn validate_theme(theme: &Theme) -> Result<(), String> {
    if !VALID_BUTTON_STYLES.contains(&theme.button_style.as_str()) {
        return Err(format!(
            "Invalid button style '{}'. Must be one of: {}",
            theme.button_style,
            VALID_BUTTON_STYLES.join(", ")
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// One entry of a profile's link list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_active: bool,
    pub order: i32,
}

/// Link as submitted by a client, where the id may be missing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkInput {
    pub id: Option<String>,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

/// Partial update of a single link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

/// A social network link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Generate a fresh link id.
pub fn new_link_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turn submitted links into stored links, assigning ids to links lacking one.
/// Missing orders default to the position in the submitted list.
pub fn normalize_links(input: Vec<LinkInput>) -> Vec<ProfileLink> {
    input
        .into_iter()
        .enumerate()
        .map(|(idx, link)| ProfileLink {
            id: link
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(new_link_id),
            title: link.title,
            url: link.url,
            icon: link.icon,
            is_active: link.is_active.unwrap_or(true),
            order: link.order.unwrap_or(idx as i32),
        })
        .collect()
}

/// Append a new link; the order defaults to the current number of links.
pub fn add_link(links: &mut Vec<ProfileLink>, input: LinkInput) -> ProfileLink {
    let link = ProfileLink {
        id: new_link_id(),
        title: input.title,
        url: input.url,
        icon: input.icon,
        is_active: input.is_active.unwrap_or(true),
        order: input.order.unwrap_or(links.len() as i32),
    };
    links.push(link.clone());
    link
}

/// Merge a patch into the link with `id`. Returns the updated link, or `None`
/// when no link has that id.
pub fn update_link(links: &mut [ProfileLink], id: &str, patch: LinkPatch) -> Option<ProfileLink> {
    let link = links.iter_mut().find(|l| l.id == id)?;
    if let Some(title) = patch.title {
        link.title = title;
    }
    if let Some(url) = patch.url {
        link.url = url;
    }
    if patch.icon.is_some() {
        link.icon = patch.icon;
    }
    if let Some(is_active) = patch.is_active {
        link.is_active = is_active;
    }
    if let Some(order) = patch.order {
        link.order = order;
    }
    Some(link.clone())
}

/// Remove the link with `id`. Returns `false` when it does not exist.
pub fn remove_link(links: &mut Vec<ProfileLink>, id: &str) -> bool {
    let before = links.len();
    links.retain(|l| l.id != id);
    links.len() != before
}

/// Rebuild the link list from an ordered id list.
///
/// Each listed link gets `order` equal to its position in `ids`. Links whose
/// id is not listed are dropped, and listed ids that match no link are
/// ignored, so the caller must always send the complete set it wants to keep.
pub fn reorder_links(links: Vec<ProfileLink>, ids: &[String]) -> Vec<ProfileLink> {
    let mut pool = links;
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(idx) = pool.iter().position(|l| &l.id == id) {
            let mut link = pool.swap_remove(idx);
            link.order = out.len() as i32;
            out.push(link);
        }
    }
    out
}

/// Active links sorted by display order, as shown on the public page.
pub fn public_links(links: &[ProfileLink]) -> Vec<ProfileLink> {
    let mut active: Vec<ProfileLink> = links.iter().filter(|l| l.is_active).cloned().collect();
    active.sort_by_key(|l| l.order);
    active
}

/// Active social links, as shown on the public page.
pub fn public_social_links(links: &[SocialLink]) -> Vec<SocialLink> {
    links.iter().filter(|l| l.is_active).cloned().collect()
}
