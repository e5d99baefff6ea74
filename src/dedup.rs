/// Lead deduplication engine.
///
/// Orchestrates the per-request pipeline:
/// candidate -> normalizer -> matcher (tenant history) -> risk scorer ->
/// decision engine -> `DecisionResult`.
///
/// The engine itself is stateless; its two collaborators (lead history
/// reader and submission-velocity reader) are injected at construction and
/// only ever read. Persisting the candidate afterwards is a caller concern,
/// guarded authoritatively by the store's unique index rather than by this
/// advisory check.
use crate::decision::{self, DecisionAction, DecisionResult, REVIEW_THRESHOLD};
use crate::errors::AppError;
use crate::matcher;
use crate::models::{CandidateLead, Lead};
use crate::risk::{self, RiskSignals};

/// Bounded lookback over a tenant's prior leads.
#[derive(Debug, Clone, Copy)]
pub struct LookbackWindow {
    /// How far back to search, in days.
    pub days: u32,
    /// Hard cap on the number of prior leads considered.
    pub limit: u32,
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            days: 90,
            limit: 500,
        }
    }
}

/// Read-only access to a tenant's prior leads.
pub trait LeadHistory {
    fn recent_leads(
        &self,
        tenant_id: &str,
        window: LookbackWindow,
    ) -> impl std::future::Future<Output = Result<Vec<Lead>, AppError>> + Send;
}

/// Read-only submission-rate counter for a tenant+source pair.
pub trait SubmissionVelocity {
    fn recent_count(
        &self,
        tenant_id: &str,
        source_id: &str,
    ) -> impl std::future::Future<Output = Result<u32, AppError>> + Send;
}

/// Engine tunables. Thresholds for matching live in `matcher`/`decision`;
/// these are the operational knobs.
#[derive(Debug, Clone, Copy)]
pub struct DedupOptions {
    pub lookback: LookbackWindow,
    /// Submissions per minute above which the velocity risk factor triggers.
    pub velocity_threshold: u32,
    /// When a dependency is unreachable: degrade to a flag_for_review
    /// partial result (true) or propagate a retryable error (false).
    /// Either way the engine never defaults to allow_processing.
    pub fail_closed: bool,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            lookback: LookbackWindow::default(),
            velocity_threshold: risk::DEFAULT_VELOCITY_THRESHOLD,
            fail_closed: false,
        }
    }
}

#[derive(Clone)]
pub struct DedupEngine<H, V> {
    history: H,
    velocity: V,
    options: DedupOptions,
}

impl<H, V> DedupEngine<H, V>
where
    H: LeadHistory,
    V: SubmissionVelocity,
{
    pub fn new(history: H, velocity: V, options: DedupOptions) -> Self {
        Self {
            history,
            velocity,
            options,
        }
    }

    /// Run a deduplication check for one candidate lead.
    ///
    /// Fails fast with a validation error when the candidate carries neither
    /// email nor phone; callers must never receive a false allow_processing
    /// for unusable data. All other data-quality concerns surface as risk
    /// factors inside the result.
    pub async fn check(
        &self,
        tenant_id: &str,
        candidate: &CandidateLead,
    ) -> Result<DecisionResult, AppError> {
        if tenant_id.trim().is_empty() {
            return Err(AppError::Validation("tenant_id is required".to_string()));
        }

        let normalized = candidate.normalized();
        if normalized.missing_contact_identity() {
            return Err(AppError::Validation(
                "At least one of email or phone is required".to_string(),
            ));
        }

        // 1. Tenant history (read-only). A store failure must not turn into
        // an implicit allow.
        let history = match self
            .history
            .recent_leads(tenant_id, self.options.lookback)
            .await
        {
            Ok(leads) => leads,
            Err(e) => return self.handle_dependency_failure(&normalized, e),
        };

        tracing::debug!(
            tenant_id,
            history_len = history.len(),
            "Matching candidate against tenant history"
        );

        // 2. Best match across the history window.
        let normalized_history: Vec<(uuid::Uuid, crate::normalizer::NormalizedLead)> = history
            .iter()
            .map(|lead| (lead.id, lead.normalized()))
            .collect();
        let best = matcher::best_match(
            &normalized,
            normalized_history.iter().map(|(id, n)| (*id, n)),
        );

        let confidence = best.as_ref().map(|m| m.confidence).unwrap_or(0.0);
        let exact_duplicate = best
            .as_ref()
            .map(|m| m.email_score >= 1.0 || m.phone_score >= 1.0)
            .unwrap_or(false);

        // 3. Submission velocity for the same tenant+source.
        let source_id = candidate.source_id.as_deref().unwrap_or("unknown");
        let submissions_last_minute = match self.velocity.recent_count(tenant_id, source_id).await {
            Ok(count) => count,
            Err(e) => return self.handle_dependency_failure(&normalized, e),
        };

        // 4. Risk assessment and final decision.
        let assessment = risk::assess(
            &normalized,
            RiskSignals {
                exact_duplicate,
                submissions_last_minute,
            },
            self.options.velocity_threshold,
        );

        let action = decision::decide(confidence, assessment.risk_level);
        let duplicate_found = confidence >= REVIEW_THRESHOLD;

        let result = DecisionResult {
            action_taken: action,
            duplicate_found,
            confidence_score: confidence,
            risk_level: assessment.risk_level,
            risk_score: assessment.risk_score,
            risk_factors: assessment.risk_factors,
            matched_lead_id: best.filter(|m| m.confidence > 0.0).map(|m| m.lead_id),
        };

        tracing::info!(
            tenant_id,
            action = result.action_taken.as_str(),
            duplicate_found = result.duplicate_found,
            confidence = result.confidence_score,
            risk_level = result.risk_level.as_str(),
            "Dedup check complete"
        );

        Ok(result)
    }

    /// A dependency failure either degrades to flag_for_review (fail-closed
    /// mode) or propagates as retryable. Risk is still assessed from the
    /// candidate's own fields so the partial result carries what we do know.
    fn handle_dependency_failure(
        &self,
        normalized: &crate::normalizer::NormalizedLead,
        err: AppError,
    ) -> Result<DecisionResult, AppError> {
        if !self.options.fail_closed {
            return Err(match err {
                e @ AppError::DatabaseError(_) | e @ AppError::DependencyUnavailable(_) => e,
                other => AppError::DependencyUnavailable(other.to_string()),
            });
        }

        tracing::warn!(
            error = %err,
            "Dependency unavailable; failing closed to flag_for_review"
        );

        let assessment = risk::assess(
            normalized,
            RiskSignals::default(),
            self.options.velocity_threshold,
        );

        Ok(DecisionResult {
            action_taken: DecisionAction::FlagForReview,
            duplicate_found: false,
            confidence_score: 0.0,
            risk_level: assessment.risk_level,
            risk_score: assessment.risk_score,
            risk_factors: assessment.risk_factors,
            matched_lead_id: None,
        })
    }
}
