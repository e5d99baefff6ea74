use crate::decision::{DecisionAction, DecisionResult};
use crate::models::CandidateLead;
use crate::risk::{RiskFactor, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the duplicate-prevention webhook.
///
/// Kept wire-compatible with the legacy workflow contract: `user_id` is the
/// tenant identifier, `lead_data` the candidate lead.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DuplicatePreventionPayload {
    pub user_id: String,
    #[serde(default)]
    pub source_id: Option<String>,
    pub lead_data: CandidateLead,
}

/// Response body shared by the webhook and the REST check endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DedupCheckResponse {
    pub success: bool,
    pub duplicate_check_complete: bool,
    pub action_taken: DecisionAction,
    pub duplicate_found: bool,
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub risk_factors: Vec<RiskFactor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_lead_id: Option<Uuid>,
}

impl From<&DecisionResult> for DedupCheckResponse {
    fn from(result: &DecisionResult) -> Self {
        Self {
            success: true,
            duplicate_check_complete: true,
            action_taken: result.action_taken,
            duplicate_found: result.duplicate_found,
            confidence_score: result.confidence_score,
            risk_level: result.risk_level,
            risk_score: result.risk_score,
            risk_factors: result.risk_factors.clone(),
            matched_lead_id: result.matched_lead_id,
        }
    }
}
