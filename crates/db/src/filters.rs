//! Search, filter, and sort parameters for list queries.
//!
//! These deserialize straight from query strings (`?q=&sort=&dir=`).
//! Sort columns are closed enums so they can be spliced into SQL safely.

use coflow_core::status::{ChangeOrderStatus, DelayNoticeStatus};
use serde::{Deserialize, Deserializer};

/// Sort direction. Lists default to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    #[default]
    CreatedAt,
    ProjectNumber,
    Name,
}

impl ProjectSort {
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::ProjectNumber => "project_number",
            Self::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrderSort {
    #[default]
    CreatedAt,
    CoNumber,
    Status,
}

impl ChangeOrderSort {
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "co.created_at",
            Self::CoNumber => "co.co_number",
            Self::Status => "co.status",
        }
    }
}

/// `GET /projects` parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectFilter {
    #[serde(deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    pub sort: ProjectSort,
    pub dir: SortDir,
}

/// `GET /change-orders` parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChangeOrderFilter {
    #[serde(deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    #[serde(deserialize_with = "blank_status_as_none")]
    pub status: Option<ChangeOrderStatus>,
    pub sort: ChangeOrderSort,
    pub dir: SortDir,
}

/// `GET /delay-notices` parameters. Always newest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DelayNoticeFilter {
    #[serde(deserialize_with = "blank_as_none")]
    pub q: Option<String>,
    #[serde(deserialize_with = "blank_status_as_none")]
    pub status: Option<DelayNoticeStatus>,
}

/// Build a case-insensitive `ILIKE` pattern matching `needle` anywhere,
/// escaping the LIKE metacharacters.
pub fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Case-insensitive substring test matching [`contains_pattern`] semantics.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&needle.trim().to_lowercase())
}

// The search form always submits every field, so `?q=&status=` must mean
// "no filter" rather than a parse error.

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn blank_status_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" 50%_off "), "%50\\%\\_off%");
    }

    #[test]
    fn contains_ci_ignores_case() {
        assert!(contains_ci("Curtain Wall Retrofit", "wall"));
        assert!(!contains_ci("Storefront", "wall"));
    }

    #[test]
    fn defaults_are_newest_first() {
        let filter = ChangeOrderFilter::default();
        assert_eq!(filter.sort, ChangeOrderSort::CreatedAt);
        assert_eq!(filter.dir, SortDir::Desc);
        assert_eq!(filter.dir.sql(), "DESC");
    }
}
