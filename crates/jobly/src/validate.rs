//! Validation helpers used by request structs.

use std::sync::OnceLock;

/// Best-effort email validation.
///
/// This is intentionally not fully RFC-compliant.
pub fn is_email(s: &str) -> bool {
    static EMAIL_RE: OnceLock<regex::Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid built-in email regex")
        })
        .is_match(s)
}

pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}
