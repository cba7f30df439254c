use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating ISO 639-1 (2-letter) and
/// ISO 639-3 (3-letter) language codes and resolving their display names,
/// used for logging and for validating the configured target language.
/// Look up a language from a 2- or 3-letter ISO code
fn lookup(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// Validate that a language code is a known ISO 639 code
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Get the English name of a language from its ISO code
pub fn get_language_name(code: &str) -> Result<String> {
    lookup(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Describe a language code for log output, falling back to the raw code
/// when it is not a recognized ISO code.
pub fn describe_language(code: &str) -> String {
    match get_language_name(code) {
        Ok(name) => format!("{} ({})", name, code),
        Err(_) => code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_code_accepts_part1_codes() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("ko").is_ok());
        assert!(validate_language_code("FR").is_ok());
    }

    #[test]
    fn test_validate_language_code_accepts_part3_codes() {
        assert!(validate_language_code("eng").is_ok());
        assert!(validate_language_code("kor").is_ok());
    }

    #[test]
    fn test_validate_language_code_rejects_unknown_codes() {
        assert!(validate_language_code("zz").is_err());
        assert!(validate_language_code("klingon").is_err());
        assert!(validate_language_code("").is_err());
    }

    #[test]
    fn test_get_language_name_resolves_names() {
        assert_eq!(get_language_name("en").unwrap(), "English");
        assert_eq!(get_language_name("ko").unwrap(), "Korean");
    }

    #[test]
    fn test_describe_language_falls_back_to_raw_code() {
        assert_eq!(describe_language("xx"), "xx");
        assert_eq!(describe_language("ko"), "Korean (ko)");
    }
}
