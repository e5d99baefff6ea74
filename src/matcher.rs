/// Duplicate matching across a tenant's prior leads.
///
/// Three similarity dimensions per prior lead:
/// - email: exact-only over canonical forms (1.0 or 0.0)
/// - phone: exact-only over normalized digit strings (1.0 or 0.0)
/// - name+company: fuzzy, combining Jaro-Winkler and normalized Levenshtein
///
/// Aggregate confidence is a weighted max: an exact email or phone match
/// short-circuits to 1.0; a fuzzy-only match is scaled by `FUZZY_WEIGHT` so it
/// stays informative without being decisive on its own.
use crate::normalizer::NormalizedLead;
use strsim::{jaro_winkler, normalized_levenshtein};
use uuid::Uuid;

/// Ceiling on what a name+company match can contribute by itself.
/// An identical name and company lands exactly at the review threshold;
/// anything less stays below it.
pub const FUZZY_WEIGHT: f64 = 0.5;

/// Relative weights inside the fuzzy dimension.
const NAME_WEIGHT: f64 = 0.6;
const COMPANY_WEIGHT: f64 = 0.4;

/// Transient comparison result between an incoming lead and one prior lead.
/// Exists only for the duration of a deduplication request; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub lead_id: Uuid,
    pub email_score: f64,
    pub phone_score: f64,
    pub name_company_score: f64,
    /// Aggregate confidence in [0, 1].
    pub confidence: f64,
}

/// Fuzzy similarity between two already-normalized strings.
///
/// Jaro-Winkler rewards shared prefixes (good for abbreviations like
/// "tech" vs "technology"); normalized Levenshtein penalizes overall edit
/// distance. Empty inputs contribute nothing.
fn string_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    0.6 * jaro_winkler(a, b) + 0.4 * normalized_levenshtein(a, b)
}

/// Combined name+company similarity.
///
/// When both dimensions are comparable they are blended 60/40 in favor of the
/// person name; when only one side has data the other weight is dropped
/// rather than diluting the score with zeros.
fn name_company_similarity(candidate: &NormalizedLead, prior: &NormalizedLead) -> f64 {
    let cand_name = candidate.full_name();
    let prior_name = prior.full_name();

    let name_comparable = !cand_name.is_empty() && !prior_name.is_empty();
    let company_comparable = !candidate.company.is_empty() && !prior.company.is_empty();

    match (name_comparable, company_comparable) {
        (true, true) => {
            NAME_WEIGHT * string_similarity(&cand_name, &prior_name)
                + COMPANY_WEIGHT * string_similarity(&candidate.company, &prior.company)
        }
        (true, false) => string_similarity(&cand_name, &prior_name),
        (false, true) => string_similarity(&candidate.company, &prior.company),
        (false, false) => 0.0,
    }
}

/// Score one prior lead against the candidate.
pub fn score_pair(candidate: &NormalizedLead, prior_id: Uuid, prior: &NormalizedLead) -> MatchCandidate {
    let email_score = if !candidate.email.is_empty() && candidate.email == prior.email {
        1.0
    } else {
        0.0
    };

    let phone_score = if !candidate.phone.is_empty() && candidate.phone == prior.phone {
        1.0
    } else {
        0.0
    };

    let name_company_score = name_company_similarity(candidate, prior);

    // Exact identity match on either anchor is decisive.
    let confidence = if email_score >= 1.0 || phone_score >= 1.0 {
        1.0
    } else {
        name_company_score * FUZZY_WEIGHT
    };

    MatchCandidate {
        lead_id: prior_id,
        email_score,
        phone_score,
        name_company_score,
        confidence,
    }
}

/// Find the best-matching prior lead, if any.
///
/// Read-only over the history slice; returns `None` for an empty history,
/// which the caller treats as confidence 0.0. Ties keep the first (most
/// recent) prior lead, so repeated calls against an unchanged history are
/// deterministic.
pub fn best_match<'a, I>(candidate: &NormalizedLead, history: I) -> Option<MatchCandidate>
where
    I: IntoIterator<Item = (Uuid, &'a NormalizedLead)>,
{
    let mut best: Option<MatchCandidate> = None;
    for (prior_id, prior) in history {
        let scored = score_pair(candidate, prior_id, prior);
        match &best {
            Some(current) if scored.confidence <= current.confidence => {}
            _ => best = Some(scored.clone()),
        }
        // Nothing can beat an exact match; stop scanning.
        if best.as_ref().map(|m| m.confidence >= 1.0).unwrap_or(false) {
            break;
        }
    }
    best
}
