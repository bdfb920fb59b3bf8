//! Domain models for waitlist signups.
//!
//! Defines the validated email newtype and the signup record that gets
//! persisted. Parsing normalizes input once, at the boundary, so everything
//! downstream works with a known-good value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Prefix shared by every storage key.
const KEY_PREFIX: &str = "waitlist";

/// Validated, normalized email address.
///
/// Construction goes through [`EmailAddress::parse`], which trims surrounding
/// whitespace, lower-cases, and applies the acceptance pattern. The pattern is
/// deliberately permissive: a non-empty local part, exactly one `@`, and a
/// domain with an interior dot, with no whitespace anywhere. It is a cheap
/// sanity filter, not an RFC 5322 verifier, and it is a documented contract —
/// tightening it would reject previously-accepted inputs.
///
/// # Example
///
/// ```
/// use waitroom_core::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalizes and validates a raw email string.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidEmail` if the trimmed, lower-cased input
    /// does not match the acceptance pattern.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        if matches_pattern(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(CoreError::InvalidEmail(input.to_string()))
        }
    }

    /// Consumes the wrapper and returns the normalized string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checks the acceptance pattern against an already-normalized address.
///
/// Equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: no whitespace anywhere,
/// exactly one `@` with a non-empty local part, and a domain containing at
/// least one `.` with a character on each side.
fn matches_pattern(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// One waitlist signup, exactly as persisted.
///
/// Records are write-once and append-only. The `ts` field is the signup
/// instant in epoch milliseconds and doubles as the chronological component
/// of the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    /// Normalized email address.
    pub email: String,
    /// Signup instant, epoch milliseconds at write time.
    pub ts: i64,
    /// Tag identifying the origin site.
    pub source: String,
}

impl Signup {
    /// Builds a signup record from a validated email, timestamp, and source
    /// tag.
    pub fn new(email: &EmailAddress, ts: i64, source: &str) -> Self {
        Self { email: email.as_ref().to_string(), ts, source: source.to_string() }
    }

    /// Derives the storage key: `waitlist:<ts>:<email>`.
    ///
    /// Deterministic per (time, email) pair, which gives natural
    /// chronological ordering. Uniqueness is per pair, not per email, so the
    /// same address resubmitted at a different instant produces a new key.
    pub fn storage_key(&self) -> String {
        format!("{}:{}:{}", KEY_PREFIX, self.ts, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        for candidate in ["a@b.c", "user@example.com", "first.last+tag@sub.domain.org"] {
            assert!(EmailAddress::parse(candidate).is_ok(), "should accept {candidate}");
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = EmailAddress::parse("  Foo@Bar.COM  ").unwrap();
        assert_eq!(email.as_ref(), "foo@bar.com");

        let canonical = EmailAddress::parse("foo@bar.com").unwrap();
        assert_eq!(email, canonical);
    }

    #[test]
    fn rejects_pattern_failures() {
        for candidate in [
            "",
            "   ",
            "not-an-email",
            "a@b",
            "a@b.",
            "@b.c",
            "a@@b.c",
            "a@b@c.d",
            "a b@c.d",
            "a@b .c",
            "a@.com",
        ] {
            assert!(EmailAddress::parse(candidate).is_err(), "should reject {candidate:?}");
        }
    }

    #[test]
    fn accepts_domains_with_empty_labels() {
        // The documented pattern only requires an interior dot, so odd but
        // pattern-conformant domains pass.
        assert!(EmailAddress::parse("x@a..com").is_ok());
        assert!(EmailAddress::parse("x@a.b.").is_ok());
    }

    #[test]
    fn storage_key_embeds_timestamp_and_email() {
        let email = EmailAddress::parse("ada@example.com").unwrap();
        let signup = Signup::new(&email, 1_735_689_600_000, "waitroom.dev");

        assert_eq!(signup.storage_key(), "waitlist:1735689600000:ada@example.com");
    }

    #[test]
    fn record_serializes_with_original_field_names() {
        let email = EmailAddress::parse("ada@example.com").unwrap();
        let signup = Signup::new(&email, 42, "waitroom.dev");

        let value = serde_json::to_value(&signup).unwrap();
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["ts"], 42);
        assert_eq!(value["source"], "waitroom.dev");
    }
}
