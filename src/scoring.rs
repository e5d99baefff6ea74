/// Lead quality scoring.
///
/// A simple additive heuristic over contact completeness and seniority,
/// clamped to [1, 100]. Deterministic; stored on the lead at creation and
/// usable as a `min_score` filter on listings.
use crate::models::CandidateLead;
use crate::normalizer::is_valid_email;

const BASE_SCORE: i32 = 50;

/// Seniority bonuses, checked against the lower-cased job title.
/// First match wins, so C-level outranks an incidental "manager" later
/// in the title.
const SENIORITY_BONUSES: &[(&str, i32)] = &[
    ("ceo", 25),
    ("cto", 25),
    ("cfo", 25),
    ("coo", 25),
    ("chief", 25),
    ("founder", 25),
    ("president", 25),
    ("vp", 20),
    ("vice president", 20),
    ("director", 15),
    ("head of", 15),
    ("manager", 10),
    ("senior", 5),
];

/// Compute the quality score for a candidate lead.
pub fn score_lead(candidate: &CandidateLead) -> i32 {
    let mut score = BASE_SCORE;

    if let Some(email) = candidate.email.as_deref() {
        if is_valid_email(email.trim()) {
            score += 15;
        }
    }

    if candidate
        .phone
        .as_deref()
        .map(|p| !p.trim().is_empty())
        .unwrap_or(false)
    {
        score += 10;
    }

    if candidate
        .company
        .as_deref()
        .map(|c| !c.trim().is_empty())
        .unwrap_or(false)
    {
        score += 5;
    }

    if let Some(title) = candidate.job_title.as_deref() {
        let title = title.to_lowercase();
        for (needle, bonus) in SENIORITY_BONUSES {
            if title.contains(needle) {
                score += bonus;
                break;
            }
        }
    }

    score.clamp(1, 100)
}
