pub mod http;
#[cfg(test)]
pub mod mock;

use crate::model::{
    ApplyRequest, AuditLogResult, ExceptionsUpdateRequest, LogQuery, LogSearchResult,
    MetricsSummary, ModeUpdateRequest, RulesUpdateRequest, TimeRange, WafStatus,
};
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status} for {endpoint}")]
    Status { endpoint: &'static str, status: u16 },
}

impl ApiError {
    /// HTTP status of the failed call, when the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            ApiError::Status { status, .. } => Some(*status),
        }
    }
}

/// The WAF control service's REST surface. Transport mechanics live behind
/// this seam so the core can be exercised against a scripted backend.
#[async_trait]
pub trait WafBackend: Send + Sync {
    async fn get_status(&self) -> Result<WafStatus, ApiError>;

    async fn set_mode(&self, req: &ModeUpdateRequest) -> Result<(), ApiError>;

    async fn set_exceptions(&self, req: &ExceptionsUpdateRequest) -> Result<(), ApiError>;

    async fn set_rules(&self, req: &RulesUpdateRequest) -> Result<(), ApiError>;

    async fn apply(&self, req: &ApplyRequest) -> Result<(), ApiError>;

    async fn metrics_summary(&self, range: &TimeRange) -> Result<MetricsSummary, ApiError>;

    async fn search_logs(&self, query: &LogQuery) -> Result<LogSearchResult, ApiError>;

    async fn audit_logs(&self, limit: usize, offset: usize) -> Result<AuditLogResult, ApiError>;
}
