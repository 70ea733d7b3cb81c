pub mod location;
pub mod time;
pub mod url_validator;

pub use location::coarse_location;
pub use time::{fmt_date, is_expired, minutes_from_now};
pub use url_validator::{is_valid_url, validate_url};

/// Alphabet for generated codes; also the only characters a custom code may use
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const MIN_CODE_LEN: usize = 4;
pub const MAX_CODE_LEN: usize = 32;

pub fn generate_random_code(length: usize) -> String {
    std::iter::repeat_with(|| CODE_CHARS[rand::random_range(0..CODE_CHARS.len())] as char)
        .take(length)
        .collect()
}

/// `[a-zA-Z0-9]{4,32}`, case sensitive
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Parse user-entered text as an integer.
///
/// Blank input is `None`. Integral floats such as `"15.0"` are accepted;
/// anything else that is not a whole number is an error.
pub fn parse_valid_int(raw: &str) -> Option<Result<i64, String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Ok(n));
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(Ok(f as i64))
        }
        _ => Some(Err(format!("'{}' is not an integer", raw))),
    }
}

/// Minimal escaping for text interpolated into HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
