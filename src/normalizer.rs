/// Canonicalization of lead identity fields.
///
/// Every comparison in the matcher runs over these canonical forms, so the
/// rules here define what "the same email/phone/company" means for the whole
/// service. All functions are pure: no network, no database, no failure modes
/// beyond returning an empty string for absent input.
use regex::Regex;
use std::sync::OnceLock;

/// Company legal suffixes dropped during normalization so that
/// "Acme Corp", "Acme Corporation" and "ACME" compare as the same company.
const COMPANY_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "llp",
    "ltd",
    "limited",
    "corp",
    "corporation",
    "co",
    "company",
    "gmbh",
    "sa",
];

/// A candidate lead with all identity fields in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLead {
    pub email: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
}

impl NormalizedLead {
    pub fn new(
        email: Option<&str>,
        phone: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
        company: Option<&str>,
    ) -> Self {
        Self {
            email: normalize_email(email.unwrap_or_default()),
            phone: normalize_phone(phone.unwrap_or_default()),
            first_name: normalize_name(first_name.unwrap_or_default()),
            last_name: normalize_name(last_name.unwrap_or_default()),
            company: normalize_company(company.unwrap_or_default()),
        }
    }

    /// Combined "first last" form used by the fuzzy matcher.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (false, false) => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// True when the lead carries neither identity anchor.
    /// The decision engine treats this as a precondition failure.
    pub fn missing_contact_identity(&self) -> bool {
        self.email.is_empty() && self.phone.is_empty()
    }
}

/// Canonical email: trimmed and lower-cased. No fuzzy treatment beyond that;
/// email matching is exact-only downstream.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonical phone: digits only, with the leading "1" country code dropped
/// from 11-digit North American numbers so that "+1-555-123-4567",
/// "(555) 123-4567" and "555.123.4567" all normalize identically.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Canonical person-name token: lower-cased, punctuation stripped,
/// whitespace collapsed.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical company name: name normalization plus removal of trailing legal
/// suffixes (Inc, LLC, Corp, ...). Suffixes are stripped repeatedly so
/// "Acme Holdings Corp Inc" reduces to "acme holdings".
pub fn normalize_company(raw: &str) -> String {
    let base = normalize_name(raw);
    let mut tokens: Vec<&str> = base.split_whitespace().collect();
    while let Some(last) = tokens.last() {
        // Never strip the only remaining token; "Co" alone is still a name.
        if tokens.len() > 1 && COMPANY_SUFFIXES.contains(last) {
            tokens.pop();
        } else {
            break;
        }
    }
    tokens.join(" ")
}

/// Extract the domain part of an already-normalized email, if present.
pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

/// Validate email address shape.
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Fake/placeholder patterns (repeated digits like 9999, 1111)
/// - Minimum length requirements
/// - Valid domain structure
///
/// Used by the quality scorer and the risk scorer; a malformed email is a
/// data-quality signal, never a hard error.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // Detect fake patterns (repeated digits)
    let fake_patterns = ["999999", "111111", "000000", "123456789"];
    for pattern in &fake_patterns {
        if email.contains(pattern) {
            tracing::debug!("Invalid email (fake pattern '{}'): {}", pattern, email);
            return false;
        }
    }

    // RFC 5322 simplified email regex, compiled once
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex is valid")
    });

    if !re.is_match(email) {
        tracing::debug!("Invalid email format: {}", email);
        return false;
    }

    true
}
