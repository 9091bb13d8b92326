use super::{ApiError, WafBackend};
use crate::model::{
    ApplyRequest, AuditLogResult, ExceptionsUpdateRequest, LogQuery, LogSearchResult,
    MetricsSummary, ModeUpdateRequest, RulesUpdateRequest, TimeRange, WafStatus,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the WAF control service.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(endpoint: &'static str, response: &reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(endpoint, "POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check(endpoint, &response)?;
        Ok(response)
    }
}

#[async_trait]
impl WafBackend for HttpBackend {
    async fn get_status(&self) -> Result<WafStatus, ApiError> {
        let response = self.client.get(self.url("/api/waf/status")).send().await?;
        Self::check("status", &response)?;
        Ok(response.json().await?)
    }

    async fn set_mode(&self, req: &ModeUpdateRequest) -> Result<(), ApiError> {
        self.post_json("mode", "/api/waf/mode", req).await?;
        Ok(())
    }

    async fn set_exceptions(&self, req: &ExceptionsUpdateRequest) -> Result<(), ApiError> {
        self.post_json("exceptions", "/api/waf/exceptions", req)
            .await?;
        Ok(())
    }

    async fn set_rules(&self, req: &RulesUpdateRequest) -> Result<(), ApiError> {
        self.post_json("rules", "/api/waf/rules", req).await?;
        Ok(())
    }

    async fn apply(&self, req: &ApplyRequest) -> Result<(), ApiError> {
        self.post_json("apply", "/api/waf/apply", req).await?;
        Ok(())
    }

    async fn metrics_summary(&self, range: &TimeRange) -> Result<MetricsSummary, ApiError> {
        let response = self
            .client
            .get(self.url("/api/metrics/summary"))
            .query(&[
                ("start", range.start.to_rfc3339()),
                ("end", range.end.to_rfc3339()),
            ])
            .send()
            .await?;
        Self::check("metrics", &response)?;
        Ok(response.json().await?)
    }

    async fn search_logs(&self, query: &LogQuery) -> Result<LogSearchResult, ApiError> {
        let response = self.post_json("logs", "/api/logs/search", query).await?;
        Ok(response.json().await?)
    }

    async fn audit_logs(&self, limit: usize, offset: usize) -> Result<AuditLogResult, ApiError> {
        let response = self
            .client
            .get(self.url("/api/audit"))
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .send()
            .await?;
        Self::check("audit", &response)?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let backend =
            HttpBackend::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.url("/api/waf/status"),
            "http://localhost:8080/api/waf/status"
        );
    }
}
