//! Query Normalization
//!
//! Turns raw, untrusted pagination/sort/filter input into a fully-populated
//! query descriptor. Normalization is pure and total: every field that is
//! absent, non-positive, non-integer, or outside the resource's allow-list is
//! replaced by a configured default, independently of the other fields.
//! Callers downstream can therefore rely on every descriptor field being
//! present and valid.

use serde::{Deserialize, Serialize};

/// Raw search parameters exactly as they arrive on the query string.
///
/// All fields are optional strings so malformed numeric input degrades to
/// the configured defaults instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchQuery {
    /// Requested page number (1-based)
    pub page: Option<String>,

    /// Requested page size
    pub page_size: Option<String>,

    /// Field to sort by
    pub sort_field: Option<String>,

    /// Sort direction, `asc` or `desc`
    pub sort_direction: Option<String>,

    /// Field to filter on
    pub filter_field: Option<String>,

    /// Case-insensitive substring to filter with
    pub filter_value: Option<String>,
}

/// Sort direction for search queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction from raw input, accepting only `asc` and `desc`
    /// (any capitalization). Anything else is rejected so the caller falls
    /// back to the configured default rather than an undefined ordering.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Fully-populated, validated search parameters.
///
/// Produced exclusively by [`SearchConfig::normalize`]; after normalization
/// every field holds either validated client input or a configured default.
/// The sort and filter fields are guaranteed members of the resource's
/// allow-lists, which is what lets the SQL backend splice them into
/// statements as identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDescriptor {
    /// Page number, always >= 1
    pub page: u32,

    /// Page size, always >= 1
    pub page_size: u32,

    /// Field the results are ordered by
    pub sort_field: String,

    /// Direction the results are ordered in
    pub sort_direction: SortDirection,

    /// Field the filter applies to
    pub filter_field: String,

    /// Substring filter; empty means no filtering
    pub filter_value: String,
}

impl QueryDescriptor {
    /// Number of records to skip for this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Maximum number of records on this page
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Whether a non-empty filter value is in effect
    pub fn is_filtered(&self) -> bool {
        !self.filter_value.is_empty()
    }

    /// Render the descriptor back into raw-input form.
    ///
    /// Normalizing the result yields the same descriptor again, which keeps
    /// descriptors round-trippable through query strings.
    pub fn as_raw(&self) -> RawSearchQuery {
        RawSearchQuery {
            page: Some(self.page.to_string()),
            page_size: Some(self.page_size.to_string()),
            sort_field: Some(self.sort_field.clone()),
            sort_direction: Some(self.sort_direction.as_str().to_string()),
            filter_field: Some(self.filter_field.clone()),
            filter_value: Some(self.filter_value.clone()),
        }
    }
}

/// Default values substituted for missing or invalid raw input
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub page: u32,
    pub page_size: u32,
    pub sort_field: &'static str,
    pub sort_direction: SortDirection,
    pub filter_field: &'static str,
}

/// Per-resource search configuration: allow-lists plus defaults.
///
/// The field lists double as the set of identifiers the SQL backend may
/// interpolate, so they must only ever contain literal column names.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Fields results may be sorted by
    pub sortable_fields: &'static [&'static str],

    /// Fields results may be filtered on
    pub filterable_fields: &'static [&'static str],

    /// Substitutes for absent or invalid input
    pub defaults: SearchDefaults,
}

impl SearchConfig {
    /// Normalize raw input into a complete descriptor.
    ///
    /// Never fails; each field is validated independently and replaced by
    /// its default when rejected. Rules:
    /// - `page` / `page_size`: accepted only when present, integer, and > 0
    /// - `sort_field` / `filter_field`: accepted only when present in the
    ///   respective allow-list
    /// - `sort_direction`: accepted only when `asc` or `desc`
    /// - `filter_value`: accepted when present and non-empty
    pub fn normalize(&self, raw: &RawSearchQuery) -> QueryDescriptor {
        QueryDescriptor {
            page: positive_int(raw.page.as_deref()).unwrap_or(self.defaults.page),
            page_size: positive_int(raw.page_size.as_deref()).unwrap_or(self.defaults.page_size),
            sort_field: allowed_field(raw.sort_field.as_deref(), self.sortable_fields)
                .unwrap_or(self.defaults.sort_field)
                .to_string(),
            sort_direction: raw
                .sort_direction
                .as_deref()
                .and_then(SortDirection::parse)
                .unwrap_or(self.defaults.sort_direction),
            filter_field: allowed_field(raw.filter_field.as_deref(), self.filterable_fields)
                .unwrap_or(self.defaults.filter_field)
                .to_string(),
            filter_value: raw
                .filter_value
                .clone()
                .filter(|value| !value.is_empty())
                .unwrap_or_default(),
        }
    }

    /// The descriptor produced when no raw input is given at all
    pub fn default_descriptor(&self) -> QueryDescriptor {
        self.normalize(&RawSearchQuery::default())
    }
}

/// Parse a strictly positive integer, rejecting signs, fractions, and junk
fn positive_int(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Return the allow-list entry matching the raw field name, if any.
///
/// Returning the static entry rather than the input means downstream SQL
/// only ever sees identifiers that are spelled in the configuration.
fn allowed_field(raw: Option<&str>, allowed: &'static [&'static str]) -> Option<&'static str> {
    let raw = raw?;
    allowed.iter().find(|field| **field == raw).copied()
}
