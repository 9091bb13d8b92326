pub mod draft;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use draft::{PolicyDraft, ValidationError};

/// WAF enforcement level for a policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WafMode {
    #[default]
    On,
    DetectionOnly,
    Off,
}

impl WafMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WafMode::On => "On",
            WafMode::DetectionOnly => "DetectionOnly",
            WafMode::Off => "Off",
        }
    }

    /// Cycle through modes in UI order: On -> DetectionOnly -> Off -> On.
    pub fn next(&self) -> WafMode {
        match self {
            WafMode::On => WafMode::DetectionOnly,
            WafMode::DetectionOnly => WafMode::Off,
            WafMode::Off => WafMode::On,
        }
    }
}

impl fmt::Display for WafMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WafMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" | "on" => Ok(WafMode::On),
            "DetectionOnly" | "detection-only" | "detectiononly" => Ok(WafMode::DetectionOnly),
            "Off" | "off" => Ok(WafMode::Off),
            _ => Err(format!(
                "invalid WAF mode: {}. Must be one of: On, DetectionOnly, Off",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WafExceptions {
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub ip_allow: Vec<String>,
    #[serde(default)]
    pub headers_allow: HashMap<String, String>,
}

impl WafExceptions {
    /// Header exceptions alone do not count: the exceptions endpoint
    /// is only worth calling when paths, methods or ip_allow carry entries.
    pub fn has_entries(&self) -> bool {
        !self.paths.is_empty() || !self.methods.is_empty() || !self.ip_allow.is_empty()
    }
}

/// A custom ModSecurity rule attached to a policy. The `rule` expression
/// is opaque to the console and never parsed client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomRule {
    pub id: String,
    pub name: String,
    pub rule: String,
    #[serde(default)]
    pub description: String,
    pub enabled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A WAF policy for a specific host, or the distinguished global policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WafPolicy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub mode: WafMode,
    #[serde(default)]
    pub enable_crs: bool,
    #[serde(default)]
    pub exceptions: WafExceptions,
    #[serde(default)]
    pub custom_rules: Vec<CustomRule>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: String,
    /// Incremented server-side on every successful mutation. The console
    /// never computes it, only echoes it back.
    #[serde(default)]
    pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ControllerConfig {
    #[serde(default)]
    pub allow_snippet_annotations: bool,
    #[serde(default)]
    pub modsecurity_snippet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WafStatus {
    #[serde(default)]
    pub global_policy: WafPolicy,
    #[serde(default)]
    pub host_policies: HashMap<String, WafPolicy>,
    #[serde(default)]
    pub controller_config: ControllerConfig,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// The trailing window ending now, the console's default log view.
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - chrono::Duration::hours(hours),
            end,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsSummary {
    #[serde(default)]
    pub total_requests: i64,
    #[serde(default)]
    pub status_4xx: i64,
    #[serde(default)]
    pub status_5xx: i64,
    #[serde(default)]
    pub status_403: i64,
    #[serde(default)]
    pub waf_blocked: i64,
    #[serde(default)]
    pub top_hosts: Vec<HostMetrics>,
    #[serde(default)]
    pub top_paths: Vec<PathMetrics>,
    #[serde(default)]
    pub top_rule_ids: Vec<RuleMetrics>,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostMetrics {
    pub host: String,
    pub requests: i64,
    pub blocked: i64,
    pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMetrics {
    pub path: String,
    pub requests: i64,
    pub blocked: i64,
    pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMetrics {
    pub rule_id: String,
    #[serde(default)]
    pub rule_name: String,
    pub count: i64,
}

/// One observed request, as returned by the log store. Immutable
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogQuery {
    pub query: String,
    pub time_range: TimeRange,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogSearchResult {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub total: usize,
    pub time_range: Option<TimeRange>,
}

/// Immutable record of a past configuration change. `old_value` and
/// `new_value` are opaque snapshots for diff display, never replayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub old_value: serde_json::Value,
    #[serde(default)]
    pub new_value: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditLogResult {
    #[serde(default)]
    pub entries: Vec<AuditLogEntry>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStrategy {
    #[default]
    Annotation,
    Configmap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeUpdateRequest {
    pub host: String,
    pub mode: WafMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_crs: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionsUpdateRequest {
    pub host: String,
    pub paths: Vec<String>,
    pub methods: Vec<String>,
    pub ip_allow: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesUpdateRequest {
    pub host: String,
    pub rules: Vec<CustomRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub host: String,
    pub strategy: ApplyStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serializes_to_exact_strings() {
        assert_eq!(serde_json::to_string(&WafMode::On).unwrap(), "\"On\"");
        assert_eq!(
            serde_json::to_string(&WafMode::DetectionOnly).unwrap(),
            "\"DetectionOnly\""
        );
        assert_eq!(serde_json::to_string(&WafMode::Off).unwrap(), "\"Off\"");
    }

    #[test]
    fn test_mode_parses_back() {
        let mode: WafMode = serde_json::from_str("\"DetectionOnly\"").unwrap();
        assert_eq!(mode, WafMode::DetectionOnly);
    }

    #[test]
    fn test_exceptions_has_entries_ignores_headers() {
        let mut exceptions = WafExceptions::default();
        assert!(!exceptions.has_entries());

        exceptions
            .headers_allow
            .insert("x-internal".to_string(), "1".to_string());
        assert!(!exceptions.has_entries());

        exceptions.paths.push("/health".to_string());
        assert!(exceptions.has_entries());
    }

    #[test]
    fn test_apply_strategy_wire_format() {
        let req = ApplyRequest {
            host: "example.com".to_string(),
            strategy: ApplyStrategy::Annotation,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["strategy"], "annotation");
    }

    #[test]
    fn test_policy_deserializes_with_missing_fields() {
        let policy: WafPolicy =
            serde_json::from_str(r#"{"host": "example.com", "mode": "Off"}"#).unwrap();
        assert_eq!(policy.host, "example.com");
        assert_eq!(policy.mode, WafMode::Off);
        assert_eq!(policy.version, 0);
        assert!(policy.custom_rules.is_empty());
    }
}
