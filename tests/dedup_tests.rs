/// Unit tests for the deduplication building blocks
/// Tests normalization, matching, risk scoring, and the decision table
use leadfly_dedup_api::normalizer::{
    is_valid_email, normalize_company, normalize_email, normalize_name, normalize_phone,
    NormalizedLead,
};

#[cfg(test)]
mod email_normalization_tests {
    use super::*;

    #[test]
    fn test_email_lowercased_and_trimmed() {
        assert_eq!(normalize_email("  John.Smith@AcmeCorp.COM "), "john.smith@acmecorp.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
        assert_eq!(normalize_email(""), "");
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.com"));
        assert!(is_valid_email("user+tag@example.co.uk"));
        assert!(is_valid_email("user_name@example-domain.com"));
    }

    #[test]
    fn test_invalid_emails_basic() {
        // Missing @ or .
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@examplecom"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));

        // Too short
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_invalid_emails_fake_patterns() {
        // Repeated digits (common fake patterns)
        assert!(!is_valid_email("1199999999333@gmail.com"));
        assert!(!is_valid_email("user999999@example.com"));
        assert!(!is_valid_email("1111111111@gmail.com"));
        assert!(!is_valid_email("000000@example.com"));
        assert!(!is_valid_email("test123456789@example.com"));
    }
}

#[cfg(test)]
mod phone_normalization_tests {
    use super::*;

    #[test]
    fn test_formats_normalize_identically() {
        // All these should normalize to the same digit string
        let formats = vec![
            "+1-555-123-4567",
            "(555) 123-4567",
            "555.123.4567",
            "555 123 4567",
            "5551234567",
            "15551234567",
        ];

        for format in formats {
            assert_eq!(
                normalize_phone(format),
                "5551234567",
                "Failed for format: {}",
                format
            );
        }
    }

    #[test]
    fn test_leading_one_only_stripped_from_nanp_length() {
        // 11 digits starting with 1: country code dropped
        assert_eq!(normalize_phone("15551234567"), "5551234567");
        // 10 digits starting with 1: kept as-is
        assert_eq!(normalize_phone("1555123456"), "1555123456");
        // Non-NANP lengths pass through digits-only
        assert_eq!(normalize_phone("+44 20 7946 0958"), "442079460958");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("no digits here"), "");
        assert_eq!(normalize_phone("ext. 42"), "42");
    }
}

#[cfg(test)]
mod name_company_normalization_tests {
    use super::*;

    #[test]
    fn test_name_punctuation_and_case() {
        assert_eq!(normalize_name("  O'Brien,  Mary-Jane "), "o brien mary jane");
        assert_eq!(normalize_name("JOHN"), "john");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_company_suffixes_removed() {
        assert_eq!(normalize_company("Acme Corp"), "acme");
        assert_eq!(normalize_company("Acme Corporation"), "acme");
        assert_eq!(normalize_company("ACME"), "acme");
        assert_eq!(normalize_company("Tech Solutions Inc"), "tech solutions");
        assert_eq!(normalize_company("Tech Solutions, Inc."), "tech solutions");
        assert_eq!(normalize_company("Acme Holdings Corp Inc"), "acme holdings");
    }

    #[test]
    fn test_company_suffix_alone_is_kept() {
        // A single-token name is never stripped to nothing
        assert_eq!(normalize_company("Inc"), "inc");
        assert_eq!(normalize_company("Co"), "co");
    }

    #[test]
    fn test_full_name_combines_present_parts() {
        let both = NormalizedLead::new(None, None, Some("John"), Some("Smith"), None);
        assert_eq!(both.full_name(), "john smith");

        let first_only = NormalizedLead::new(None, None, Some("John"), None, None);
        assert_eq!(first_only.full_name(), "john");

        let neither = NormalizedLead::new(None, None, None, None, None);
        assert_eq!(neither.full_name(), "");
    }

    #[test]
    fn test_missing_contact_identity() {
        let no_anchor = NormalizedLead::new(None, None, Some("Test"), None, Some("Test Co"));
        assert!(no_anchor.missing_contact_identity());

        let email_only = NormalizedLead::new(Some("a@b.com"), None, None, None, None);
        assert!(!email_only.missing_contact_identity());

        let phone_only = NormalizedLead::new(None, Some("5551234567"), None, None, None);
        assert!(!phone_only.missing_contact_identity());
    }
}

#[cfg(test)]
mod matcher_tests {
    use leadfly_dedup_api::matcher::{best_match, score_pair, FUZZY_WEIGHT};
    use leadfly_dedup_api::normalizer::NormalizedLead;
    use uuid::Uuid;

    fn lead(
        email: Option<&str>,
        phone: Option<&str>,
        first: Option<&str>,
        last: Option<&str>,
        company: Option<&str>,
    ) -> NormalizedLead {
        NormalizedLead::new(email, phone, first, last, company)
    }

    #[test]
    fn test_exact_email_is_decisive() {
        let candidate = lead(Some("a@b.com"), Some("5559998888"), Some("X"), None, None);
        let prior = lead(Some("A@B.com"), Some("5551234567"), Some("Y"), None, None);
        let scored = score_pair(&candidate, Uuid::new_v4(), &prior);
        assert_eq!(scored.confidence, 1.0);
    }

    #[test]
    fn test_no_fuzzy_email_matching() {
        // Near-identical emails are still not a match: exact-only by contract
        let candidate = lead(Some("john.smith@acmecorp.com"), None, None, None, None);
        let prior = lead(Some("john.smyth@acmecorp.com"), None, None, None, None);
        let scored = score_pair(&candidate, Uuid::new_v4(), &prior);
        assert_eq!(scored.email_score, 0.0);
    }

    #[test]
    fn test_empty_emails_never_match_each_other() {
        let candidate = lead(None, Some("5551234567"), None, None, None);
        let prior = lead(None, Some("5559998888"), None, None, None);
        let scored = score_pair(&candidate, Uuid::new_v4(), &prior);
        assert_eq!(scored.email_score, 0.0);
        assert_eq!(scored.phone_score, 0.0);
    }

    #[test]
    fn test_fuzzy_name_company_bounds() {
        // Similar-but-not-identical person and company names
        let candidate = lead(None, Some("5551112222"), Some("Mike"), Some("Johnson"), Some("Tech Solutions Inc"));
        let prior = lead(None, Some("5553334444"), Some("Michael"), Some("Johnson"), Some("Technology Solutions Inc"));
        let scored = score_pair(&candidate, Uuid::new_v4(), &prior);

        assert!(scored.confidence > 0.0, "fuzzy signal should be non-zero");
        assert!(scored.confidence < 0.9, "fuzzy alone must not reject");
        assert!(scored.confidence <= FUZZY_WEIGHT);
        assert!(scored.name_company_score > 0.5);
    }

    #[test]
    fn test_unrelated_leads_score_near_zero() {
        let candidate = lead(Some("a@b.com"), None, Some("John"), Some("Doe"), Some("Acme"));
        let prior = lead(Some("x@y.com"), None, Some("Zelda"), Some("Quixote"), Some("Umbrella"));
        let scored = score_pair(&candidate, Uuid::new_v4(), &prior);
        assert!(scored.confidence < 0.5);
    }

    #[test]
    fn test_best_match_returns_highest_confidence() {
        let candidate = lead(Some("john@acme.com"), None, Some("John"), Some("Doe"), Some("Acme Corp"));
        let weak_id = Uuid::new_v4();
        let strong_id = Uuid::new_v4();
        let weak = lead(Some("other@other.com"), None, Some("Joan"), Some("Doe"), Some("Acme Inc"));
        let strong = lead(Some("john@acme.com"), None, None, None, None);

        let history = vec![(weak_id, &weak), (strong_id, &strong)];
        let best = best_match(&candidate, history).unwrap();
        assert_eq!(best.lead_id, strong_id);
        assert_eq!(best.confidence, 1.0);
    }
}

#[cfg(test)]
mod risk_scoring_tests {
    use leadfly_dedup_api::normalizer::NormalizedLead;
    use leadfly_dedup_api::risk::{assess, RiskFactor, RiskLevel, RiskSignals, DEFAULT_VELOCITY_THRESHOLD};

    fn normalized(email: Option<&str>, phone: Option<&str>, company: Option<&str>) -> NormalizedLead {
        NormalizedLead::new(email, phone, None, None, company)
    }

    #[test]
    fn test_risk_level_is_max_severity() {
        // Medium factor (disposable) + high factor (exact dup) => high
        let lead = normalized(Some("x@tempmail.com"), Some("5551234567"), Some("Acme"));
        let signals = RiskSignals {
            exact_duplicate: true,
            submissions_last_minute: 0,
        };
        let assessment = assess(&lead, signals, DEFAULT_VELOCITY_THRESHOLD);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.risk_factors.len(), 2);
    }

    #[test]
    fn test_disposable_domain_detection() {
        for domain in ["tempmail.com", "mailinator.com", "guerrillamail.com", "yopmail.com"] {
            let lead = normalized(Some(&format!("user@{}", domain)), Some("5551234567"), Some("Acme"));
            let assessment = assess(&lead, RiskSignals::default(), DEFAULT_VELOCITY_THRESHOLD);
            assert!(
                assessment.risk_factors.contains(&RiskFactor::DisposableEmailDomain),
                "domain {} should be flagged",
                domain
            );
        }

        let normal = normalized(Some("user@acmecorp.com"), Some("5551234567"), Some("Acme"));
        let assessment = assess(&normal, RiskSignals::default(), DEFAULT_VELOCITY_THRESHOLD);
        assert!(assessment.risk_factors.is_empty());
    }

    #[test]
    fn test_missing_fields_requires_both_absent() {
        // Phone present, company absent: fine
        let with_phone = normalized(Some("a@b.com"), Some("5551234567"), None);
        let assessment = assess(&with_phone, RiskSignals::default(), DEFAULT_VELOCITY_THRESHOLD);
        assert!(!assessment.risk_factors.contains(&RiskFactor::MissingContactFields));

        // Both absent: flagged
        let bare = normalized(Some("a@b.com"), None, None);
        let assessment = assess(&bare, RiskSignals::default(), DEFAULT_VELOCITY_THRESHOLD);
        assert!(assessment.risk_factors.contains(&RiskFactor::MissingContactFields));
    }

    #[test]
    fn test_custom_velocity_threshold() {
        let lead = normalized(Some("a@b.com"), Some("5551234567"), Some("Acme"));
        let signals = RiskSignals {
            exact_duplicate: false,
            submissions_last_minute: 2,
        };
        // Threshold 1: 2/min triggers
        let assessment = assess(&lead, signals, 1);
        assert!(assessment.risk_factors.contains(&RiskFactor::SubmissionVelocityExceeded));
        // Default threshold 3: 2/min does not
        let assessment = assess(&lead, signals, DEFAULT_VELOCITY_THRESHOLD);
        assert!(assessment.risk_factors.is_empty());
    }
}

#[cfg(test)]
mod decision_table_tests {
    use leadfly_dedup_api::decision::{decide, DecisionAction, DUPLICATE_THRESHOLD, REVIEW_THRESHOLD};
    use leadfly_dedup_api::risk::RiskLevel;

    #[test]
    fn test_decision_table_rows() {
        // >= 0.9, any risk -> reject
        for risk in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(decide(1.0, risk), DecisionAction::RejectDuplicate);
            assert_eq!(decide(DUPLICATE_THRESHOLD, risk), DecisionAction::RejectDuplicate);
        }

        // [0.5, 0.9), any risk -> review
        for risk in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(decide(REVIEW_THRESHOLD, risk), DecisionAction::FlagForReview);
            assert_eq!(decide(0.89, risk), DecisionAction::FlagForReview);
        }

        // < 0.5: risk decides
        assert_eq!(decide(0.0, RiskLevel::Low), DecisionAction::AllowProcessing);
        assert_eq!(decide(0.49, RiskLevel::Low), DecisionAction::AllowProcessing);
        assert_eq!(decide(0.0, RiskLevel::Medium), DecisionAction::FlagForReview);
        assert_eq!(decide(0.49, RiskLevel::High), DecisionAction::FlagForReview);
    }
}

#[cfg(test)]
mod quality_scoring_tests {
    use leadfly_dedup_api::models::CandidateLead;
    use leadfly_dedup_api::scoring::score_lead;

    #[test]
    fn test_richer_leads_score_higher() {
        let bare = CandidateLead {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let full = CandidateLead {
            email: Some("jane@acmecorp.com".to_string()),
            phone: Some("+1-555-123-4567".to_string()),
            company: Some("Acme Corporation".to_string()),
            job_title: Some("Director of Engineering".to_string()),
            ..Default::default()
        };
        assert!(score_lead(&full) > score_lead(&bare));
    }

    #[test]
    fn test_score_always_in_bounds() {
        let empty = CandidateLead::default();
        let score = score_lead(&empty);
        assert!((1..=100).contains(&score));
    }
}

#[cfg(test)]
mod error_handling_tests {
    use leadfly_dedup_api::errors::{AppError, ResultExt};

    #[test]
    fn test_app_error_types() {
        let validation = AppError::Validation("missing email and phone".to_string());
        assert!(matches!(validation, AppError::Validation(_)));

        let dependency = AppError::DependencyUnavailable("store down".to_string());
        assert!(matches!(dependency, AppError::DependencyUnavailable(_)));

        let db_error = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert!(matches!(db_error, AppError::DatabaseError(_)));

        let not_found = AppError::NotFound("lead not found".to_string());
        assert!(matches!(not_found, AppError::NotFound(_)));
    }

    #[test]
    fn test_error_display() {
        let error = AppError::Validation("At least one of email or phone is required".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Validation error"));
        assert!(display.contains("email or phone"));

        let error = AppError::DependencyUnavailable("lead store circuit open".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Dependency unavailable"));
    }

    #[test]
    fn test_context_wraps_and_preserves_source() {
        let result: Result<(), AppError> =
            Err(AppError::NotFound("lead 42".to_string())).context("Loading lead");
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::WithContext { .. }));
        let display = format!("{}", err);
        assert!(display.contains("Loading lead"));
        assert!(display.contains("Not found"));
    }

    #[test]
    fn test_context_wraps_database_errors() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let err = result
            .with_context(|| "Failed to load lead".to_string())
            .unwrap_err();
        match err {
            AppError::WithContext { source, context } => {
                assert_eq!(context, "Failed to load lead");
                assert!(matches!(*source, AppError::DatabaseError(_)));
            }
            other => panic!("Expected WithContext, got {}", other),
        }
    }
}
