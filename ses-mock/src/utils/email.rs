use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SesError};

/// Local part, "@", dot-separated domain labels, final label of two or more letters
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Check address syntax. No DNS or mailbox lookup is done.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Basic email validation
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(SesError::InvalidParameterValue(
            "Invalid email format".to_string(),
        ))
    }
}
