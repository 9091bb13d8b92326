use super::{ApiError, WafBackend};
use crate::model::{
    ApplyRequest, AuditLogResult, CustomRule, ExceptionsUpdateRequest, LogQuery, LogSearchResult,
    MetricsSummary, ModeUpdateRequest, RulesUpdateRequest, TimeRange, WafExceptions, WafPolicy,
    WafStatus,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

/// Scripted in-memory control service for tests. Records every call in
/// order, fails the endpoints listed in `fail`, and persists mode /
/// exceptions / rules mutations into its own status snapshot so a
/// subsequent `get_status` reflects them.
#[derive(Default)]
pub struct MockBackend {
    pub calls: Mutex<Vec<String>>,
    pub fail: Mutex<HashSet<&'static str>>,
    pub status: Mutex<WafStatus>,
    pub metrics: Mutex<MetricsSummary>,
    pub logs: Mutex<LogSearchResult>,
    pub audit: Mutex<AuditLogResult>,
    /// When non-empty, each `metrics_summary` call pops a receiver and
    /// waits on it, letting a test decide resolution order.
    pub metrics_gates: Mutex<VecDeque<tokio::sync::oneshot::Receiver<MetricsSummary>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_endpoint(&self, endpoint: &'static str) {
        self.fail.lock().insert(endpoint);
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.lock().push(endpoint.to_string());
        if self.fail.lock().contains(endpoint) {
            return Err(ApiError::Status {
                endpoint,
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WafBackend for MockBackend {
    async fn get_status(&self) -> Result<WafStatus, ApiError> {
        self.record("status")?;
        Ok(self.status.lock().clone())
    }

    async fn set_mode(&self, req: &ModeUpdateRequest) -> Result<(), ApiError> {
        self.record("mode")?;

        let mut status = self.status.lock();
        let policy = status
            .host_policies
            .entry(req.host.clone())
            .or_insert_with(|| WafPolicy {
                host: req.host.clone(),
                ..Default::default()
            });
        policy.mode = req.mode;
        if let Some(enable_crs) = req.enable_crs {
            policy.enable_crs = enable_crs;
        }
        policy.version += 1;
        Ok(())
    }

    async fn set_exceptions(&self, req: &ExceptionsUpdateRequest) -> Result<(), ApiError> {
        self.record("exceptions")?;

        let mut status = self.status.lock();
        if let Some(policy) = status.host_policies.get_mut(&req.host) {
            policy.exceptions = WafExceptions {
                paths: req.paths.clone(),
                methods: req.methods.clone(),
                ip_allow: req.ip_allow.clone(),
                ..Default::default()
            };
            policy.version += 1;
        }
        Ok(())
    }

    async fn set_rules(&self, req: &RulesUpdateRequest) -> Result<(), ApiError> {
        self.record("rules")?;

        let mut status = self.status.lock();
        if let Some(policy) = status.host_policies.get_mut(&req.host) {
            policy.custom_rules = req.rules.to_vec();
            policy.version += 1;
        }
        Ok(())
    }

    async fn apply(&self, _req: &ApplyRequest) -> Result<(), ApiError> {
        self.record("apply")?;
        Ok(())
    }

    async fn metrics_summary(&self, _range: &TimeRange) -> Result<MetricsSummary, ApiError> {
        self.record("metrics")?;

        let gate = self.metrics_gates.lock().pop_front();
        if let Some(gate) = gate {
            // Resolution order is controlled by whoever holds the sender.
            return Ok(gate.await.unwrap_or_default());
        }
        Ok(self.metrics.lock().clone())
    }

    async fn search_logs(&self, _query: &LogQuery) -> Result<LogSearchResult, ApiError> {
        self.record("logs")?;
        Ok(self.logs.lock().clone())
    }

    async fn audit_logs(&self, _limit: usize, _offset: usize) -> Result<AuditLogResult, ApiError> {
        self.record("audit")?;
        Ok(self.audit.lock().clone())
    }
}

/// Convenience for seeding scripted rules.
pub fn custom_rule(id: &str, name: &str) -> CustomRule {
    CustomRule {
        id: id.to_string(),
        name: name.to_string(),
        rule: "SecRule REQUEST_URI \"@contains /admin\" \"deny\"".to_string(),
        description: String::new(),
        enabled: true,
        created_at: None,
    }
}
