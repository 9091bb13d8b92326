use crate::client::{ApiError, WafBackend};
use crate::model::{
    ApplyRequest, ApplyStrategy, CustomRule, ExceptionsUpdateRequest, ModeUpdateRequest,
    PolicyDraft, RulesUpdateRequest, ValidationError, WafExceptions,
};
use crate::store::AppStore;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// The backend models mode, exceptions and custom rules as separate
/// resources, so a policy save is an ordered sequence of calls rather than
/// one atomic write. Each step gets a single attempt and earlier steps are
/// never rolled back; the outcome names the exact step an operator has to
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    Mode,
    Exceptions,
    Rules,
    Apply,
}

impl SaveStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStep::Mode => "mode",
            SaveStep::Exceptions => "exceptions",
            SaveStep::Rules => "rules",
            SaveStep::Apply => "apply",
        }
    }
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{step} step failed: {message}")]
pub struct StepFailure {
    pub step: SaveStep,
    /// HTTP status of the failed call, when the backend answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl StepFailure {
    fn new(step: SaveStep, err: ApiError) -> Self {
        Self {
            step,
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

/// Result of the multi-step creation protocol. The partial states are
/// explicit: a failure after the first step still leaves a valid (if
/// incomplete) policy on the backend, and the caller decides what to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Every attempted step succeeded.
    Created,
    /// Mode was written; the exceptions or rules step then failed before
    /// any exceptions landed.
    CreatedModeOnly(StepFailure),
    /// Mode and exceptions were written; the rules step failed.
    CreatedModeAndExceptions(StepFailure),
    /// The mode step itself failed; the client considers nothing created.
    Failed(StepFailure),
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, SaveOutcome::Created)
    }

    /// The failing step, when any attempted step failed.
    pub fn failure(&self) -> Option<&StepFailure> {
        match self {
            SaveOutcome::Created => None,
            SaveOutcome::CreatedModeOnly(f)
            | SaveOutcome::CreatedModeAndExceptions(f)
            | SaveOutcome::Failed(f) => Some(f),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Step(#[from] StepFailure),
}

/// Applies policy drafts to the control service as ordered sequences of
/// single-attempt calls, then re-fetches status so the store reflects
/// backend truth rather than the optimistic draft.
pub struct PolicySequencer {
    backend: Arc<dyn WafBackend>,
    store: Arc<AppStore>,
}

impl PolicySequencer {
    pub fn new(backend: Arc<dyn WafBackend>, store: Arc<AppStore>) -> Self {
        Self { backend, store }
    }

    /// Create a new policy: mode first, then exceptions (only when the
    /// draft carries any), then custom rules (only when non-empty).
    ///
    /// Steps run strictly in order; a later step is only issued once the
    /// previous response has been observed. No retries, no rollback.
    pub async fn create(&self, draft: &PolicyDraft) -> Result<SaveOutcome, ValidationError> {
        draft.validate()?;

        let host = draft.effective_host().to_string();
        let outcome = self.run_creation(&host, draft).await;

        match &outcome {
            SaveOutcome::Created => info!(host = %host, "policy created"),
            other => {
                if let Some(failure) = other.failure() {
                    warn!(host = %host, step = %failure.step, "policy creation incomplete");
                }
            }
        }

        // Whatever happened, displayed state must come from the backend.
        self.store.fetch_status(self.backend.as_ref()).await;

        Ok(outcome)
    }

    async fn run_creation(&self, host: &str, draft: &PolicyDraft) -> SaveOutcome {
        let mode_req = ModeUpdateRequest {
            host: host.to_string(),
            mode: draft.mode,
            enable_crs: Some(draft.enable_crs),
        };
        if let Err(err) = self.backend.set_mode(&mode_req).await {
            return SaveOutcome::Failed(StepFailure::new(SaveStep::Mode, err));
        }

        let mut exceptions_written = false;
        if draft.has_exceptions() {
            let req = ExceptionsUpdateRequest {
                host: host.to_string(),
                paths: draft.exceptions.paths.clone(),
                methods: draft.exceptions.methods.clone(),
                ip_allow: draft.exceptions.ip_allow.clone(),
                enabled: true,
            };
            if let Err(err) = self.backend.set_exceptions(&req).await {
                return SaveOutcome::CreatedModeOnly(StepFailure::new(SaveStep::Exceptions, err));
            }
            exceptions_written = true;
        }

        if !draft.custom_rules.is_empty() {
            let req = RulesUpdateRequest {
                host: host.to_string(),
                rules: draft.custom_rules.clone(),
            };
            if let Err(err) = self.backend.set_rules(&req).await {
                let failure = StepFailure::new(SaveStep::Rules, err);
                return if exceptions_written {
                    SaveOutcome::CreatedModeAndExceptions(failure)
                } else {
                    SaveOutcome::CreatedModeOnly(failure)
                };
            }
        }

        SaveOutcome::Created
    }

    /// Save an existing policy. Only the mode endpoint is touched;
    /// exceptions and rules are edited through their own operations.
    pub async fn update(&self, draft: &PolicyDraft) -> Result<(), SaveError> {
        draft.validate()?;

        let req = ModeUpdateRequest {
            host: draft.effective_host().to_string(),
            mode: draft.mode,
            enable_crs: Some(draft.enable_crs),
        };
        let result = self
            .backend
            .set_mode(&req)
            .await
            .map_err(|err| StepFailure::new(SaveStep::Mode, err));

        self.store.fetch_status(self.backend.as_ref()).await;

        if let Err(ref failure) = result {
            warn!(host = %req.host, "policy update failed: {}", failure);
        }
        Ok(result?)
    }

    /// Replace a policy's exceptions in one call.
    pub async fn set_exceptions(
        &self,
        host: &str,
        exceptions: &WafExceptions,
    ) -> Result<(), StepFailure> {
        let req = ExceptionsUpdateRequest {
            host: host.to_string(),
            paths: exceptions.paths.clone(),
            methods: exceptions.methods.clone(),
            ip_allow: exceptions.ip_allow.clone(),
            enabled: true,
        };
        let result = self
            .backend
            .set_exceptions(&req)
            .await
            .map_err(|err| StepFailure::new(SaveStep::Exceptions, err));

        self.store.fetch_status(self.backend.as_ref()).await;
        result
    }

    /// Replace a policy's custom rule list in one call.
    pub async fn set_rules(&self, host: &str, rules: &[CustomRule]) -> Result<(), StepFailure> {
        let req = RulesUpdateRequest {
            host: host.to_string(),
            rules: rules.to_vec(),
        };
        let result = self
            .backend
            .set_rules(&req)
            .await
            .map_err(|err| StepFailure::new(SaveStep::Rules, err));

        self.store.fetch_status(self.backend.as_ref()).await;
        result
    }

    /// Materialize the stored policy into enforcement configuration.
    /// Always a distinct action after a successful save, never part of one.
    pub async fn apply(&self, host: &str, strategy: ApplyStrategy) -> Result<(), StepFailure> {
        let req = ApplyRequest {
            host: host.to_string(),
            strategy,
        };
        self.backend
            .apply(&req)
            .await
            .map_err(|err| StepFailure::new(SaveStep::Apply, err))?;

        info!(host = %host, "configuration applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{custom_rule, MockBackend};
    use crate::model::WafMode;

    fn build_sequencer(backend: Arc<MockBackend>) -> (PolicySequencer, Arc<AppStore>) {
        let store = Arc::new(AppStore::new());
        (PolicySequencer::new(backend, store.clone()), store)
    }

    fn draft_with_exceptions() -> PolicyDraft {
        let mut draft = PolicyDraft::new("example.com");
        draft.mode = WafMode::On;
        draft.add_path("/health");
        draft
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_calls() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, _) = build_sequencer(backend.clone());

        let result = sequencer.create(&PolicyDraft::new("")).await;

        assert_eq!(result.unwrap_err(), ValidationError::MissingHost);
        assert!(backend.call_log().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_exceptions_issues_mode_then_exceptions() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, _) = build_sequencer(backend.clone());

        let outcome = sequencer.create(&draft_with_exceptions()).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Created);
        // Two mutation calls in order, then the status refetch.
        assert_eq!(backend.call_log(), vec!["mode", "exceptions", "status"]);
    }

    #[tokio::test]
    async fn test_create_bare_draft_issues_only_mode() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, _) = build_sequencer(backend.clone());

        let mut draft = PolicyDraft::new("example.com");
        draft.mode = WafMode::DetectionOnly;
        let outcome = sequencer.create(&draft).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Created);
        assert_eq!(backend.call_log(), vec!["mode", "status"]);
    }

    #[tokio::test]
    async fn test_mode_failure_aborts_sequence() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_endpoint("mode");
        let (sequencer, _) = build_sequencer(backend.clone());

        let mut draft = draft_with_exceptions();
        draft.add_rule(Some("r1".to_string()), "a", "SecRule ...", "");
        let outcome = sequencer.create(&draft).await.unwrap();

        match outcome {
            SaveOutcome::Failed(failure) => {
                assert_eq!(failure.step, SaveStep::Mode);
                assert_eq!(failure.status, Some(500));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        // Neither exceptions nor rules were attempted.
        assert_eq!(backend.call_log(), vec!["mode", "status"]);
    }

    #[tokio::test]
    async fn test_exceptions_failure_skips_rules_and_names_step() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_endpoint("exceptions");
        let (sequencer, _) = build_sequencer(backend.clone());

        let mut draft = draft_with_exceptions();
        draft.add_rule(Some("r1".to_string()), "a", "SecRule ...", "");
        let outcome = sequencer.create(&draft).await.unwrap();

        match outcome {
            SaveOutcome::CreatedModeOnly(failure) => {
                assert_eq!(failure.step, SaveStep::Exceptions);
            }
            other => panic!("expected CreatedModeOnly, got {:?}", other),
        }
        // The rules call is never issued once exceptions fail.
        assert_eq!(backend.call_log(), vec!["mode", "exceptions", "status"]);
    }

    #[tokio::test]
    async fn test_rules_failure_after_exceptions() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_endpoint("rules");
        let (sequencer, _) = build_sequencer(backend.clone());

        let mut draft = draft_with_exceptions();
        draft.custom_rules.push(custom_rule("r1", "block admin"));
        let outcome = sequencer.create(&draft).await.unwrap();

        match outcome {
            SaveOutcome::CreatedModeAndExceptions(failure) => {
                assert_eq!(failure.step, SaveStep::Rules);
            }
            other => panic!("expected CreatedModeAndExceptions, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rules_failure_without_exceptions_reports_mode_only() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_endpoint("rules");
        let (sequencer, _) = build_sequencer(backend.clone());

        let mut draft = PolicyDraft::new("example.com");
        draft.custom_rules.push(custom_rule("r1", "block admin"));
        let outcome = sequencer.create(&draft).await.unwrap();

        match outcome {
            SaveOutcome::CreatedModeOnly(failure) => {
                assert_eq!(failure.step, SaveStep::Rules);
            }
            other => panic!("expected CreatedModeOnly, got {:?}", other),
        }
        assert_eq!(backend.call_log(), vec!["mode", "rules", "status"]);
    }

    #[tokio::test]
    async fn test_update_issues_exactly_one_mutation_call() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, _) = build_sequencer(backend.clone());

        // Exceptions and rules content must not trigger extra calls.
        let mut draft = draft_with_exceptions();
        draft.custom_rules.push(custom_rule("r1", "block admin"));
        draft.existing = true;

        sequencer.update(&draft).await.unwrap();

        assert_eq!(backend.call_log(), vec!["mode", "status"]);
    }

    #[tokio::test]
    async fn test_apply_does_not_refetch_status() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, _) = build_sequencer(backend.clone());

        sequencer
            .apply("example.com", ApplyStrategy::Annotation)
            .await
            .unwrap();

        assert_eq!(backend.call_log(), vec!["apply"]);
    }

    #[tokio::test]
    async fn test_failed_save_still_refetches_status() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_endpoint("mode");
        let (sequencer, store) = build_sequencer(backend.clone());

        let result = sequencer.update(&draft_with_exceptions()).await;

        assert!(matches!(result, Err(SaveError::Step(_))));
        assert_eq!(backend.call_log(), vec!["mode", "status"]);
        assert!(store.status().is_some());
    }

    #[tokio::test]
    async fn test_create_then_store_reflects_backend_truth() {
        let backend = Arc::new(MockBackend::new());
        let (sequencer, store) = build_sequencer(backend.clone());

        let outcome = sequencer.create(&draft_with_exceptions()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let status = store.status().expect("status fetched after save");
        let policy = &status.host_policies["example.com"];
        assert_eq!(policy.mode, WafMode::On);
        assert_eq!(policy.exceptions.paths, vec!["/health"]);
    }

    #[test]
    fn test_step_failure_display_names_the_step() {
        let failure = StepFailure {
            step: SaveStep::Exceptions,
            status: Some(502),
            message: "backend returned 502 for exceptions".to_string(),
        };
        let rendered = failure.to_string();
        assert!(rendered.starts_with("exceptions step failed"));
        assert!(rendered.contains("502"));
    }
}
