/// Heuristic risk classification for an incoming lead.
///
/// Risk never raises an error: low data quality surfaces as a risk level and
/// a set of named factors so that operators can see exactly why a lead was
/// flagged. The level is the maximum severity among triggered factors.
use crate::normalizer::{email_domain, is_valid_email, NormalizedLead};
use serde::{Deserialize, Serialize};

/// Submissions per minute from the same tenant+source above which the
/// velocity factor triggers.
pub const DEFAULT_VELOCITY_THRESHOLD: u32 = 3;

/// Domains of well-known disposable/temporary email providers.
const DISPOSABLE_EMAIL_DOMAINS: &[&str] = &[
    "tempmail.com",
    "temp-mail.org",
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "yopmail.com",
    "throwawaymail.com",
    "getnada.com",
    "sharklasers.com",
    "trashmail.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Named risk factors, reported as a set for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Matcher found an exact email or phone duplicate.
    ExactDuplicate,
    /// Email domain belongs to a known disposable provider.
    DisposableEmailDomain,
    /// Phone and company are both absent. Recorded for observability even
    /// when a working email keeps the severity low.
    MissingContactFields,
    /// Submission rate from the same tenant+source exceeded the threshold.
    SubmissionVelocityExceeded,
}

impl RiskFactor {
    fn severity(&self, email_anchored: bool) -> RiskLevel {
        match self {
            RiskFactor::ExactDuplicate => RiskLevel::High,
            // Sparse contact data only escalates when there is no usable
            // email to reach the lead through.
            RiskFactor::MissingContactFields => {
                if email_anchored {
                    RiskLevel::Low
                } else {
                    RiskLevel::Medium
                }
            }
            RiskFactor::DisposableEmailDomain | RiskFactor::SubmissionVelocityExceeded => {
                RiskLevel::Medium
            }
        }
    }

    fn weight(&self) -> u32 {
        match self {
            RiskFactor::ExactDuplicate => 60,
            RiskFactor::DisposableEmailDomain => 25,
            RiskFactor::SubmissionVelocityExceeded => 25,
            RiskFactor::MissingContactFields => 15,
        }
    }
}

/// Transient classification derived per request; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    /// Sum of factor weights, clamped to [0, 100].
    pub risk_score: u32,
}

impl RiskAssessment {
    fn from_factors(factors: Vec<RiskFactor>, email_anchored: bool) -> Self {
        let risk_level = factors
            .iter()
            .map(|f| f.severity(email_anchored))
            .max()
            .unwrap_or(RiskLevel::Low);
        let risk_score = factors.iter().map(|f| f.weight()).sum::<u32>().min(100);
        Self {
            risk_level,
            risk_factors: factors,
            risk_score,
        }
    }
}

/// Signals from outside the candidate record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskSignals {
    /// Did the matcher find an exact email/phone duplicate?
    pub exact_duplicate: bool,
    /// Submissions from the same tenant+source in the trailing minute.
    pub submissions_last_minute: u32,
}

/// Assess the candidate against the heuristic factors.
///
/// Pure given its inputs; the velocity count is read by the caller before
/// invoking this so the assessment itself stays deterministic.
pub fn assess(
    candidate: &NormalizedLead,
    signals: RiskSignals,
    velocity_threshold: u32,
) -> RiskAssessment {
    let mut factors = Vec::new();

    if signals.exact_duplicate {
        factors.push(RiskFactor::ExactDuplicate);
    }

    if let Some(domain) = email_domain(&candidate.email) {
        if DISPOSABLE_EMAIL_DOMAINS.contains(&domain) {
            factors.push(RiskFactor::DisposableEmailDomain);
        }
    }

    if candidate.phone.is_empty() && candidate.company.is_empty() {
        factors.push(RiskFactor::MissingContactFields);
    }

    if signals.submissions_last_minute > velocity_threshold {
        factors.push(RiskFactor::SubmissionVelocityExceeded);
    }

    RiskAssessment::from_factors(factors, is_valid_email(&candidate.email))
}
