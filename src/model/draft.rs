use super::{CustomRule, WafExceptions, WafMode, WafPolicy};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host is required for a host-scoped policy")]
    MissingHost,
    #[error("duplicate custom rule id: {0}")]
    DuplicateRuleId(String),
}

/// In-flight policy form state. The draft lives until the operator saves
/// or cancels; it is discarded after a save attempt regardless of outcome.
#[derive(Debug, Clone, Default)]
pub struct PolicyDraft {
    pub host: String,
    /// The distinguished global policy has no host requirement.
    pub global: bool,
    pub mode: WafMode,
    pub enable_crs: bool,
    pub exceptions: WafExceptions,
    pub custom_rules: Vec<CustomRule>,
    /// Set when the draft was opened from an existing policy. Host is
    /// immutable after creation, so edit surfaces disable the host field.
    pub existing: bool,
}

impl PolicyDraft {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            enable_crs: true,
            ..Default::default()
        }
    }

    pub fn global() -> Self {
        Self {
            global: true,
            enable_crs: true,
            ..Default::default()
        }
    }

    /// Open a draft over an existing policy for editing.
    pub fn from_policy(policy: &WafPolicy) -> Self {
        Self {
            host: policy.host.clone(),
            global: policy.host == "global",
            mode: policy.mode,
            enable_crs: policy.enable_crs,
            exceptions: policy.exceptions.clone(),
            custom_rules: policy.custom_rules.clone(),
            existing: true,
        }
    }

    /// Host key used on the wire. The global policy is addressed as
    /// "global" by the control service.
    pub fn effective_host(&self) -> &str {
        if self.global {
            "global"
        } else {
            &self.host
        }
    }

    /// Runs before any network call is issued.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.global && self.host.is_empty() {
            return Err(ValidationError::MissingHost);
        }

        let mut seen = HashSet::new();
        for rule in &self.custom_rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ValidationError::DuplicateRuleId(rule.id.clone()));
            }
        }

        Ok(())
    }

    pub fn has_exceptions(&self) -> bool {
        self.exceptions.has_entries()
    }

    // Exception lists behave as ordered sets: adding a present value or
    // removing an absent one is a no-op.

    pub fn add_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.exceptions.paths.contains(&path) {
            self.exceptions.paths.push(path);
        }
    }

    pub fn remove_path(&mut self, path: &str) {
        self.exceptions.paths.retain(|p| p != path);
    }

    pub fn add_method(&mut self, method: impl Into<String>) {
        let method = method.into();
        if !self.exceptions.methods.contains(&method) {
            self.exceptions.methods.push(method);
        }
    }

    pub fn remove_method(&mut self, method: &str) {
        self.exceptions.methods.retain(|m| m != method);
    }

    pub fn add_ip(&mut self, ip: impl Into<String>) {
        let ip = ip.into();
        if !self.exceptions.ip_allow.contains(&ip) {
            self.exceptions.ip_allow.push(ip);
        }
    }

    pub fn remove_ip(&mut self, ip: &str) {
        self.exceptions.ip_allow.retain(|i| i != ip);
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.exceptions
            .headers_allow
            .insert(name.into(), value.into());
    }

    pub fn remove_header(&mut self, name: &str) {
        self.exceptions.headers_allow.remove(name);
    }

    /// Add a custom rule, generating a provisional id when none is given.
    /// The backend may replace provisional ids on save.
    pub fn add_rule(
        &mut self,
        id: Option<String>,
        name: impl Into<String>,
        rule: impl Into<String>,
        description: impl Into<String>,
    ) -> String {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.custom_rules.push(CustomRule {
            id: id.clone(),
            name: name.into(),
            rule: rule.into(),
            description: description.into(),
            enabled: true,
            created_at: None,
        });
        id
    }

    pub fn remove_rule(&mut self, id: &str) {
        self.custom_rules.retain(|r| r.id != id);
    }

    pub fn toggle_rule(&mut self, id: &str) {
        if let Some(rule) = self.custom_rules.iter_mut().find(|r| r.id == id) {
            rule.enabled = !rule.enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_host_fails_validation() {
        let draft = PolicyDraft::new("");
        assert_eq!(draft.validate(), Err(ValidationError::MissingHost));
    }

    #[test]
    fn test_global_draft_needs_no_host() {
        let draft = PolicyDraft::global();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.effective_host(), "global");
    }

    #[test]
    fn test_duplicate_rule_id_fails_validation() {
        let mut draft = PolicyDraft::new("example.com");
        draft.add_rule(Some("r1".to_string()), "block admin", "SecRule ...", "");
        draft.add_rule(Some("r1".to_string()), "block debug", "SecRule ...", "");

        assert_eq!(
            draft.validate(),
            Err(ValidationError::DuplicateRuleId("r1".to_string()))
        );
    }

    #[test]
    fn test_valid_draft_with_no_exceptions_or_rules() {
        let draft = PolicyDraft::new("example.com");
        assert!(draft.validate().is_ok());
        assert!(!draft.has_exceptions());
    }

    #[test]
    fn test_add_path_is_idempotent() {
        let mut draft = PolicyDraft::new("example.com");
        draft.add_path("/health");
        draft.add_path("/metrics");
        draft.add_path("/health");

        assert_eq!(draft.exceptions.paths, vec!["/health", "/metrics"]);
    }

    #[test]
    fn test_remove_absent_path_leaves_list_unchanged() {
        let mut draft = PolicyDraft::new("example.com");
        draft.add_path("/health");
        draft.add_path("/metrics");

        draft.remove_path("/nope");

        assert_eq!(draft.exceptions.paths, vec!["/health", "/metrics"]);
    }

    #[test]
    fn test_add_rule_generates_provisional_id() {
        let mut draft = PolicyDraft::new("example.com");
        let id = draft.add_rule(None, "block admin", "SecRule ...", "deny /admin");

        assert!(!id.is_empty());
        assert_eq!(draft.custom_rules.len(), 1);
        assert_eq!(draft.custom_rules[0].id, id);
        assert!(draft.custom_rules[0].enabled);
    }

    #[test]
    fn test_remove_and_toggle_rule() {
        let mut draft = PolicyDraft::new("example.com");
        draft.add_rule(Some("r1".to_string()), "a", "SecRule ...", "");
        draft.add_rule(Some("r2".to_string()), "b", "SecRule ...", "");

        draft.toggle_rule("r2");
        assert!(!draft.custom_rules[1].enabled);

        draft.remove_rule("r1");
        assert_eq!(draft.custom_rules.len(), 1);
        assert_eq!(draft.custom_rules[0].id, "r2");

        // Removing an absent rule is a no-op.
        draft.remove_rule("r1");
        assert_eq!(draft.custom_rules.len(), 1);
    }

    #[test]
    fn test_from_policy_marks_existing() {
        let policy = WafPolicy {
            host: "example.com".to_string(),
            mode: WafMode::DetectionOnly,
            ..Default::default()
        };
        let draft = PolicyDraft::from_policy(&policy);
        assert!(draft.existing);
        assert_eq!(draft.mode, WafMode::DetectionOnly);
    }
}
