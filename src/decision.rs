/// Decision engine: a pure mapping from (duplicate confidence, risk level)
/// to an action. No hidden state; identical inputs always produce identical
/// results.
///
/// | confidence        | risk level     | action            |
/// |-------------------|----------------|-------------------|
/// | >= 0.9            | any            | reject_duplicate  |
/// | [0.5, 0.9)        | any            | flag_for_review   |
/// | < 0.5             | high or medium | flag_for_review   |
/// | < 0.5             | low            | allow_processing  |
use crate::risk::{RiskFactor, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Confidence at or above which a lead is rejected as a certain duplicate.
pub const DUPLICATE_THRESHOLD: f64 = 0.9;
/// Confidence at or above which a lead is at least flagged for human review;
/// also the cutoff for reporting `duplicate_found`.
pub const REVIEW_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    AllowProcessing,
    FlagForReview,
    RejectDuplicate,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::AllowProcessing => "allow_processing",
            DecisionAction::FlagForReview => "flag_for_review",
            DecisionAction::RejectDuplicate => "reject_duplicate",
        }
    }
}

/// The synchronous response contract of a deduplication check.
/// Not stored by the core; callers decide whether to persist it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub action_taken: DecisionAction,
    pub duplicate_found: bool,
    /// Aggregate match confidence in [0, 1].
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub risk_factors: Vec<RiskFactor>,
    /// The best-matching prior lead, when one exists.
    pub matched_lead_id: Option<Uuid>,
}

/// Map confidence and risk to an action.
pub fn decide(confidence: f64, risk_level: RiskLevel) -> DecisionAction {
    if confidence >= DUPLICATE_THRESHOLD {
        DecisionAction::RejectDuplicate
    } else if confidence >= REVIEW_THRESHOLD {
        DecisionAction::FlagForReview
    } else if risk_level != RiskLevel::Low {
        DecisionAction::FlagForReview
    } else {
        DecisionAction::AllowProcessing
    }
}
