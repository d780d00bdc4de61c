//! Redaction helpers for secrets that may reach the console
//!
//! Credential fields (private key, key id, access token) must never be
//! printed verbatim. Wrap them in `SanitizedValue` before formatting.

use std::fmt;

/// Number of leading characters kept visible for long values
const VISIBLE_PREFIX: usize = 4;

/// Wrapper that redacts a secret when displayed.
///
/// Values longer than 8 characters keep their first 4 characters followed by
/// `...REDACTED`; shorter or empty values print as `REDACTED`.
#[derive(Clone, Copy)]
pub struct SanitizedValue<'a>(&'a str);

impl<'a> SanitizedValue<'a> {
    pub fn new(value: &'a str) -> Self {
        Self(value)
    }

    /// The raw value. Only for actual use, never for logging.
    pub fn expose(&self) -> &'a str {
        self.0
    }
}

impl fmt::Display for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.chars().count() > 8 {
            let prefix: String = self.0.chars().take(VISIBLE_PREFIX).collect();
            write!(f, "{}...REDACTED", prefix)
        } else {
            f.write_str("REDACTED")
        }
    }
}

impl fmt::Debug for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SanitizedValue(***)")
    }
}

/// Shorthand for `SanitizedValue::new(value)`
pub fn sanitize(value: &str) -> SanitizedValue<'_> {
    SanitizedValue::new(value)
}
