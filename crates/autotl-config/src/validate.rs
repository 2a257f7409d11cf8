//! Parsing and validation helpers for raw configuration values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Split a filter list supplied as one string into individual patterns.
///
/// Patterns are separated by whitespace, so a pattern cannot itself contain
/// a literal space; use `\s` or `.` instead.
#[must_use]
pub fn parse_filter_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn parse_daemon_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidField {
            field: "transmission_url",
            value: Some(raw.to_string()),
            reason: "unsupported_scheme",
        }),
    }
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField { field })
    } else {
        Ok(())
    }
}

pub(crate) fn validate_site(site: &str) -> ConfigResult<()> {
    require_non_empty("site", site)?;
    if site.contains('/') || site.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidField {
            field: "site",
            value: Some(site.to_string()),
            reason: "not_a_host",
        });
    }
    Ok(())
}

pub(crate) fn validate_filters(filters: &[String]) -> ConfigResult<()> {
    if filters.is_empty() {
        return Err(ConfigError::MissingField { field: "filters" });
    }
    if filters.iter().any(|filter| filter.trim().is_empty()) {
        return Err(ConfigError::InvalidField {
            field: "filters",
            value: None,
            reason: "blank_pattern",
        });
    }
    Ok(())
}
