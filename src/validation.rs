use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Checks the `local@domain.tld` shape. Pure, no normalization.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
