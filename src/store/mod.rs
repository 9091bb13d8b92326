use crate::client::WafBackend;
use crate::model::{AuditLogResult, LogQuery, LogSearchResult, MetricsSummary, TimeRange, WafStatus};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Session-wide cache of the last known backend state.
///
/// Constructed once at application start and handed to whatever needs it;
/// tests build isolated instances. Each fetch replaces its slice wholesale.
/// A failed fetch records a reason string and leaves the previous slice in
/// place, so the console keeps showing stale data instead of blanking.
///
/// Locks are never held across an await, so two in-flight fetches of the
/// same slice simply race and the last one to resolve wins.
#[derive(Default)]
pub struct AppStore {
    status: RwLock<Option<WafStatus>>,
    metrics: RwLock<Option<MetricsSummary>>,
    logs: RwLock<Option<LogSearchResult>>,
    audit_logs: RwLock<Option<AuditLogResult>>,
    loading: AtomicBool,
    error: RwLock<Option<String>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<WafStatus> {
        self.status.read().clone()
    }

    pub fn metrics(&self) -> Option<MetricsSummary> {
        self.metrics.read().clone()
    }

    pub fn logs(&self) -> Option<LogSearchResult> {
        self.logs.read().clone()
    }

    pub fn audit_logs(&self) -> Option<AuditLogResult> {
        self.audit_logs.read().clone()
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    fn begin(&self) {
        self.loading.store(true, Ordering::Relaxed);
        *self.error.write() = None;
    }

    fn fail(&self, reason: &str) {
        warn!("{}", reason);
        *self.error.write() = Some(reason.to_string());
        self.loading.store(false, Ordering::Relaxed);
    }

    pub async fn fetch_status(&self, backend: &dyn WafBackend) {
        self.begin();
        match backend.get_status().await {
            Ok(status) => {
                *self.status.write() = Some(status);
                self.loading.store(false, Ordering::Relaxed);
            }
            Err(_) => self.fail("Failed to fetch status"),
        }
    }

    pub async fn fetch_metrics(&self, backend: &dyn WafBackend, range: &TimeRange) {
        self.begin();
        match backend.metrics_summary(range).await {
            Ok(metrics) => {
                *self.metrics.write() = Some(metrics);
                self.loading.store(false, Ordering::Relaxed);
            }
            Err(_) => self.fail("Failed to fetch metrics"),
        }
    }

    pub async fn search_logs(&self, backend: &dyn WafBackend, query: &LogQuery) {
        self.begin();
        match backend.search_logs(query).await {
            Ok(logs) => {
                *self.logs.write() = Some(logs);
                self.loading.store(false, Ordering::Relaxed);
            }
            Err(_) => self.fail("Failed to search logs"),
        }
    }

    pub async fn fetch_audit_logs(&self, backend: &dyn WafBackend, limit: usize, offset: usize) {
        self.begin();
        match backend.audit_logs(limit, offset).await {
            Ok(audit) => {
                *self.audit_logs.write() = Some(audit);
                self.loading.store(false, Ordering::Relaxed);
            }
            Err(_) => self.fail("Failed to fetch audit logs"),
        }
    }
}
