//! Substring heuristics over `User-Agent` strings.
//!
//! Two classifiers exist. [`classify_device`] runs when a scan is recorded and
//! its result is stored on the scan row. [`dashboard_bucket`] is the coarser
//! grouping used by the admin device breakdown, which always lands in one of
//! three buckets.

pub const DEVICE_MOBILE: &str = "mobile";
pub const DEVICE_TABLET: &str = "tablet";
pub const DEVICE_DESKTOP: &str = "desktop";
pub const DEVICE_UNKNOWN: &str = "unknown";

pub const BROWSER_UNKNOWN: &str = "unknown";

/// Device class stored on a scan row.
pub fn classify_device(user_agent: Option<&str>) -> &'static str {
    let Some(ua) = user_agent.filter(|ua| !ua.is_empty()) else {
        return DEVICE_UNKNOWN;
    };
    let ua = ua.to_lowercase();
    if ua.contains("mobile") {
        DEVICE_MOBILE
    } else if ua.contains("tablet") || ua.contains("ipad") {
        DEVICE_TABLET
    } else if ua.contains("mozilla") {
        DEVICE_DESKTOP
    } else {
        DEVICE_UNKNOWN
    }
}

/// Browser family stored on a scan row. Checked in the order Chrome, Safari,
/// Firefox, Edge.
pub fn classify_browser(user_agent: Option<&str>) -> &'static str {
    let Some(ua) = user_agent.filter(|ua| !ua.is_empty()) else {
        return BROWSER_UNKNOWN;
    };
    let ua = ua.to_lowercase();
    if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("edge") {
        "Edge"
    } else {
        BROWSER_UNKNOWN
    }
}

/// Bucket used by the analytics device breakdown.
pub fn dashboard_bucket(user_agent: Option<&str>) -> &'static str {
    let ua = user_agent.unwrap_or_default().to_lowercase();
    if ua.contains("mobile") || ua.contains("android") || ua.contains("iphone") {
        DEVICE_MOBILE
    } else if ua.contains("tablet") || ua.contains("ipad") {
        DEVICE_TABLET
    } else {
        DEVICE_DESKTOP
    }
}

/// Resolve the client IP from proxy headers, falling back to the peer address.
///
/// Only the first hop of `X-Forwarded-For` is used.
pub fn client_ip(
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
    peer: Option<String>,
) -> Option<String> {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| real_ip.map(str::trim).filter(|v| !v.is_empty()))
        .map(str::to_string)
        .or(peer)
}
