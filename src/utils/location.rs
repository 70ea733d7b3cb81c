//! Coarse visitor location, derived from a timezone label and the preferred
//! language instead of any geolocation lookup.

use chrono::Local;

const DEFAULT_LANGUAGE: &str = "en";

/// `"<timezone> • <language>"`.
///
/// `timezone` falls back to the host UTC offset, `accept_language` to `en`.
pub fn coarse_location(timezone: Option<&str>, accept_language: Option<&str>) -> String {
    let tz = timezone
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
        .map(str::to_string)
        .unwrap_or_else(host_utc_offset);
    let lang = accept_language
        .and_then(primary_language)
        .unwrap_or(DEFAULT_LANGUAGE);

    format!("{} • {}", tz, lang)
}

fn host_utc_offset() -> String {
    Local::now().offset().to_string()
}

/// First tag of an `Accept-Language` header, e.g. `en-US` from
/// `en-US,en;q=0.9`
pub fn primary_language(header: &str) -> Option<&str> {
    header
        .split(',')
        .next()
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
}
