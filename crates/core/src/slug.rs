//! Profile slug derivation and validation.
//!
//! A slug is the public address of a profile page (`/p/{slug}`). Slugs are
//! lowercase and limited to `[a-z0-9._-]`, 3 to 50 characters long.

use std::sync::LazyLock;

use regex::Regex;

pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 50;

/// Fallback used when a name folds down to nothing.
pub const FALLBACK_SLUG: &str = "user";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("valid regex"));

/// Validate a candidate slug (already lowercased by the caller).
pub fn validate_slug(slug: &str) -> Result<(), String> {
    let len = slug.chars().count();
    if !(MIN_SLUG_LENGTH..=MAX_SLUG_LENGTH).contains(&len) {
        return Err(format!(
            "Slug must be between {MIN_SLUG_LENGTH} and {MAX_SLUG_LENGTH} characters"
        ));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(
            "Slug may only contain lowercase letters, digits, '.', '_' and '-'".to_string(),
        );
    }
    Ok(())
}

/// Fold the common Latin diacritics to their ASCII base letter.
fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

fn clean_part(part: &str) -> String {
    part.to_lowercase()
        .chars()
        .map(fold_char)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Derive the base slug `first.last` from a person's names.
///
/// Lowercases, folds accents and drops everything outside `[a-z0-9]` from each
/// part, then joins the non-empty parts with a dot.
///
/// ```
/// use inutile_core::slug::base_slug;
/// assert_eq!(base_slug("Élodie", "Dupont-Martin"), "elodie.dupontmartin");
/// assert_eq!(base_slug("", "  "), "user");
/// ```
pub fn base_slug(first_name: &str, last_name: &str) -> String {
    let parts: Vec<String> = [first_name, last_name]
        .iter()
        .map(|p| clean_part(p))
        .filter(|p| !p.is_empty())
        .collect();

    let mut slug = if parts.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        parts.join(".")
    };

    // Leave room for a numeric suffix.
    slug.truncate(MAX_SLUG_LENGTH - 6);
    while slug.len() < MIN_SLUG_LENGTH {
        slug.push('0');
    }
    slug
}

/// Candidate slug for the `attempt`-th try: the base itself, then `base1`,
/// `base2`, and so on.
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs_pass() {
        assert!(validate_slug("jean.dupont").is_ok());
        assert!(validate_slug("a_b-c").is_ok());
        assert!(validate_slug("abc").is_ok());
    }

    #[test]
    fn invalid_slugs_fail() {
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug(&"a".repeat(51)).is_err());
        assert!(validate_slug("Jean").is_err());
        assert!(validate_slug("jean dupont").is_err());
        assert!(validate_slug("jean/dupont").is_err());
    }

    #[test]
    fn base_slug_joins_with_dot() {
        assert_eq!(base_slug("Jean", "Dupont"), "jean.dupont");
    }

    #[test]
    fn base_slug_folds_accents_and_strips_symbols() {
        assert_eq!(base_slug("François", "L'Hôpital"), "francois.lhopital");
    }

    #[test]
    fn base_slug_is_always_valid() {
        for (first, last) in [("", ""), ("Zoë", ""), ("X", "Y"), ("李", "王")] {
            let slug = base_slug(first, last);
            assert!(validate_slug(&slug).is_ok(), "{slug} should be valid");
        }
    }

    #[test]
    fn candidates_append_counter() {
        assert_eq!(candidate("jean.dupont", 0), "jean.dupont");
        assert_eq!(candidate("jean.dupont", 2), "jean.dupont2");
    }
}
