//! Server health.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Degraded,
    Unhealthy,
    #[serde(other)]
    Unknown,
}

/// `GET /health` payload. A degraded server answers with HTTP 503 and this
/// same body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthLevel,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    /// Per-service details, shaped by the server.
    #[serde(default)]
    pub services: HashMap<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthLevel::Healthy
    }

    /// Status string of one service, when it reports one.
    pub fn service_status(&self, name: &str) -> Option<&str> {
        match self.services.get(name)? {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(obj) => obj.get("status").and_then(|s| s.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_payload() {
        let raw = r#"{"status":"degraded","timestamp":"2024-03-01T10:00:00+08:00",
            "services":{"data_source":{"status":"unhealthy","url":"http://x"},
                        "cache":{"enabled":true},"favorites":"healthy"},
            "uptime":"1h2m3s"}"#;
        let status: HealthStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(status.status, HealthLevel::Degraded);
        assert!(!status.is_healthy());
        assert_eq!(status.service_status("data_source"), Some("unhealthy"));
        assert_eq!(status.service_status("favorites"), Some("healthy"));
        assert_eq!(status.service_status("cache"), None);
    }

    #[test]
    fn test_unknown_level() {
        let status: HealthStatus = serde_json::from_str(r#"{"status":"starting"}"#).unwrap();
        assert_eq!(status.status, HealthLevel::Unknown);
    }
}
