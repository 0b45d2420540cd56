//! Query parameter normalization.
//!
//! Converts raw query-string values into typed, defaulted filter criteria.
//! Defaults apply only when a parameter is absent; a value that is present
//! but malformed or out of domain is rejected with
//! [`AppError::InvalidParameter`] before any pipeline is built.

use crate::error::{AppError, Result};

/// Credit-limit threshold applied when `limit` is absent.
pub const DEFAULT_CREDIT_LIMIT: i64 = 10_000;

/// Row cap for the top-stations report when `limit` is absent.
pub const DEFAULT_STATION_LIMIT: i64 = 10;

/// Normalized criteria for the active-clients report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveClientsCriteria {
    /// `None` means no constraint on account status.
    pub active: Option<bool>,
    /// Minimum credit limit, greater-than-or-equal semantics.
    pub min_limit: i64,
}

impl ActiveClientsCriteria {
    pub fn from_query(active: Option<&str>, limit: Option<&str>) -> Result<Self> {
        Ok(Self {
            active: bool_flag(active),
            min_limit: match limit {
                None => DEFAULT_CREDIT_LIMIT,
                Some(raw) => parse_int("limit", raw)?,
            },
        })
    }
}

/// Silent-default boolean policy: absent means no filter; present compares
/// case-insensitively against `"true"`, anything else is `false`.
pub fn bool_flag(raw: Option<&str>) -> Option<bool> {
    raw.map(|v| v.eq_ignore_ascii_case("true"))
}

/// Required result-set size for top-N reports.
pub fn top_n(raw: Option<&str>) -> Result<i64> {
    let n = parse_int("n", required("n", raw)?)?;
    if n < 1 {
        return Err(invalid("n", "must be at least 1"));
    }
    Ok(n)
}

/// Optional row cap for the top-stations report.
pub fn station_limit(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_STATION_LIMIT);
    };
    let limit = parse_int("limit", raw)?;
    if limit < 1 {
        return Err(invalid("limit", "must be at least 1"));
    }
    Ok(limit)
}

/// Required hour of day, domain `[0, 23]`.
pub fn hour(raw: Option<&str>) -> Result<i32> {
    let hour = parse_int("hour", required("hour", raw)?)?;
    if !(0..=23).contains(&hour) {
        return Err(invalid("hour", "must be between 0 and 23"));
    }
    Ok(hour as i32)
}

/// Required day of week, domain `[1, 7]` with 1 = Sunday (the store's
/// `$dayOfWeek` convention, not ISO).
pub fn day_of_week(raw: Option<&str>) -> Result<i32> {
    let day = parse_int("dayOfWeek", required("dayOfWeek", raw)?)?;
    if !(1..=7).contains(&day) {
        return Err(invalid("dayOfWeek", "must be between 1 and 7 (1 = Sunday)"));
    }
    Ok(day as i32)
}

fn required<'a>(name: &'static str, raw: Option<&'a str>) -> Result<&'a str> {
    raw.ok_or_else(|| invalid(name, "required"))
}

fn parse_int(name: &'static str, raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| invalid(name, &format!("`{raw}` is not an integer")))
}

fn invalid(name: &'static str, reason: &str) -> AppError {
    AppError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}
