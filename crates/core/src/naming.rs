//! Character name rules.
//!
//! Save names follow the game's strict naming rules (letters with at most one
//! `_` or `-` in the middle). Statistics identifiers are case-insensitive and
//! stored lower-cased.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Pattern every save name must match before any lookup is attempted.
pub const CHARACTER_NAME_PATTERN: &str = r"^[a-zA-Z]+[_-]?[a-zA-Z]+$";

/// Minimum length of a character name accepted by statistics deletion.
pub const MIN_STATISTICS_NAME_LENGTH: usize = 2;

static CHARACTER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CHARACTER_NAME_PATTERN).expect("valid regex"));

/// Check a save name against [`CHARACTER_NAME_PATTERN`].
pub fn is_valid_character_name(name: &str) -> bool {
    CHARACTER_NAME_RE.is_match(name)
}

/// Validate a save name, returning [`CoreError::InvalidArgument`] on mismatch.
pub fn validate_character_name(name: &str) -> Result<(), CoreError> {
    if is_valid_character_name(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidArgument(format!(
            "character name '{name}' does not match {CHARACTER_NAME_PATTERN}"
        )))
    }
}

/// Lower-case an account or character identifier for storage and lookup.
pub fn normalize_identifier(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_plain_and_separated_names() {
        for name in ["nokka", "Nokka", "ab", "sir_lancelot", "Dark-Wanderer"] {
            assert!(is_valid_character_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_names_outside_the_pattern() {
        for name in [
            "",
            "a",
            "_nokka",
            "nokka_",
            "no__kka",
            "no_k-ka",
            "nokka1",
            "../etc/passwd",
            "nok ka",
        ] {
            assert!(!is_valid_character_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn validate_returns_invalid_argument() {
        assert_matches!(
            validate_character_name("bad/name"),
            Err(CoreError::InvalidArgument(_))
        );
        assert!(validate_character_name("nokka").is_ok());
    }

    #[test]
    fn normalize_lower_cases() {
        assert_eq!(normalize_identifier("NoKKa"), "nokka");
    }
}
