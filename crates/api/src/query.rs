//! Shared query parameter types for API handlers.

use inutile_core::analytics::Period;
use inutile_core::error::CoreError;
use inutile_core::pagination::{clamp_limit, clamp_page, DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;
use utoipa::IntoParams;

/// Page-number pagination (`?page=&limit=&search=`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size, at most 100.
    pub limit: Option<i64>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

impl PageParams {
    /// Clamped `(page, limit)` using the given default page size.
    pub fn resolve(&self, default_limit: i64) -> (i64, i64) {
        (
            clamp_page(self.page),
            clamp_limit(self.limit, default_limit, MAX_LIMIT),
        )
    }

    /// Clamped `(page, limit)` with the standard default page size.
    pub fn resolve_default(&self) -> (i64, i64) {
        self.resolve(DEFAULT_LIMIT)
    }

    /// The search term, ignoring blank input.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Reporting window for the analytics endpoints (`?period=30d`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodParams {
    /// One of `7d`, `30d`, `90d`, `1y`.
    pub period: Option<String>,
    pub limit: Option<i64>,
}

impl PeriodParams {
    /// Parsed period; absent means the default window, unknown is rejected.
    pub fn period(&self) -> Result<Period, CoreError> {
        match self.period.as_deref() {
            None | Some("") => Ok(Period::default()),
            Some(p) => p.parse(),
        }
    }
}

/// Low-stock threshold (`?threshold=N`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThresholdParams {
    pub threshold: Option<i64>,
}
