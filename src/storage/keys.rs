//! Persisted key names.

pub const LINKS: &str = "linkstash_links_v1";
pub const LOGS: &str = "linkstash_logs_v1";
/// Codes dropped by the expiry sweep; they stay taken
pub const RETIRED: &str = "linkstash_retired_v1";

const CLICKS_PREFIX: &str = "linkstash_clicks_";
const CLICKS_SUFFIX: &str = "_v1";

/// Per-code click list key
pub fn clicks(code: &str) -> String {
    format!("{}{}{}", CLICKS_PREFIX, code, CLICKS_SUFFIX)
}

/// The code a click list key belongs to
pub fn code_of_clicks_key(key: &str) -> Option<&str> {
    key.strip_prefix(CLICKS_PREFIX)?
        .strip_suffix(CLICKS_SUFFIX)
        .filter(|code| !code.is_empty())
}
