use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code and where it points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    /// `None` never expires
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub validity_mins: u32,
}

impl ShortLink {
    /// Expired once the current time reaches `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        crate::utils::is_expired(self.expires_at, now)
    }

    pub fn short_url(&self, public_host: &str) -> String {
        format!("{}/{}", public_host.trim_end_matches('/'), self.code)
    }
}

/// One recorded resolution of a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRecord {
    pub timestamp: DateTime<Utc>,
    /// Referrer, or `Direct`
    pub source: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMeta {
    pub app: String,
}

/// Summary of one dispatched store action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload_shape: Vec<String>,
    #[serde(default)]
    pub route: String,
    pub meta: LogMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink {
            code: "abcd".to_string(),
            url: "https://example.com".to_string(),
            created_at: Utc::now(),
            expires_at,
            validity_mins: 30,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(link(Some(now)).is_expired_at(now));
        assert!(link(Some(now - Duration::seconds(1))).is_expired_at(now));
        assert!(!link(Some(now + Duration::seconds(1))).is_expired_at(now));
        assert!(!link(None).is_expired_at(now));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(link(None)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("validityMins").is_some());
        assert!(json.get("expiresAt").is_some());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"code":"abcd","url":"https://a.io","createdAt":"2024-01-01T00:00:00Z",
            "expiresAt":null,"validityMins":30,"clicks":0}"#;
        let parsed: ShortLink = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.code, "abcd");
        assert!(parsed.expires_at.is_none());
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        assert_eq!(link(None).short_url("http://localhost:3000/"), "http://localhost:3000/abcd");
    }
}
