//! Input classification and postal query formatting
//!
//! Classifies a raw query string as a postal code (and which regional
//! format) or a free-text place name, and formats postal codes into the
//! exact query the upstream zip-geocoding endpoint expects. Both
//! operations are total: they never fail and have no side effects.

use std::sync::LazyLock;

use regex::Regex;

/// Regional postal code formats recognized by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalRegion {
    /// US ZIP: 5 digits, optionally -4 more
    UnitedStates,
    /// UK postcode, e.g. SW1A 1AA
    UnitedKingdom,
    /// Canadian postal code, e.g. K1A 0A6
    Canada,
    /// 4-6 digit numeric code covering other countries
    GenericNumeric,
}

/// Classification of a raw location query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Input matches a known postal code format
    Zipcode(PostalRegion),
    /// Anything else: treat as a place name
    FreeText,
}

static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid US ZIP pattern"));
static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}\d[A-Z\d]?\s?\d[A-Z]{2}$").expect("valid UK postcode pattern")
});
static CA_POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]\d[A-Z]\s?\d[A-Z]\d$").expect("valid CA postal pattern")
});
static GENERIC_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,6}$").expect("valid numeric code pattern"));

/// Classify a raw query string. First matching rule wins.
#[must_use]
pub fn classify(input: &str) -> QueryKind {
    let trimmed = input.trim();

    if US_ZIP.is_match(trimmed) {
        QueryKind::Zipcode(PostalRegion::UnitedStates)
    } else if UK_POSTCODE.is_match(trimmed) {
        QueryKind::Zipcode(PostalRegion::UnitedKingdom)
    } else if CA_POSTAL.is_match(trimmed) {
        QueryKind::Zipcode(PostalRegion::Canada)
    } else if GENERIC_NUMERIC.is_match(trimmed) {
        QueryKind::Zipcode(PostalRegion::GenericNumeric)
    } else {
        QueryKind::FreeText
    }
}

/// Format a classified postal code for the upstream zip-geocoding endpoint.
///
/// A query that already carries a comma-separated country code is passed
/// through unchanged; otherwise the region's ISO suffix is appended.
/// Unrecognized numeric codes default to the US.
#[must_use]
pub fn format_postal_query(input: &str, region: PostalRegion) -> String {
    let trimmed = input.trim();

    // Caller already supplied a country code, e.g. "12345,MX"
    if trimmed.contains(',') {
        return trimmed.to_string();
    }

    let suffix = match region {
        PostalRegion::UnitedStates | PostalRegion::GenericNumeric => "US",
        PostalRegion::UnitedKingdom => "GB",
        PostalRegion::Canada => "CA",
    };

    format!("{trimmed},{suffix}")
}
