//! Validated language type.
//!
//! A `Language` can only be constructed for a locale present in the registry,
//! so downstream code never has to re-check the supported set.

use crate::i18n::{LanguageConfig, LanguageRegistry, Verification};
use anyhow::{bail, Result};
use std::fmt;

/// A locale validated against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "es")
    code: &'static str,
}

impl Language {
    /// English, the default locale.
    pub const ENGLISH: Language = Language { code: "en" };

    /// French, the only email-verified locale.
    pub const FRENCH: Language = Language { code: "fr" };

    /// Create a `Language` from an ISO 639-1 code string.
    ///
    /// # Errors
    /// Fails if the code is not in the supported set.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            // Use the static str from the registry
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unsupported language code: '{}'", code),
        }
    }

    /// The default locale new users start with.
    pub fn default_language() -> Language {
        let config = LanguageRegistry::get().default_language();
        Language { code: config.code }
    }

    /// The ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full registry configuration for this locale.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a properly constructed `Language`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// The verification channel this locale requires.
    pub fn verification(&self) -> Verification {
        self.config().verification
    }

    /// English name of the locale.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Whether this is the default locale (commits without verification).
    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_constant() {
        let english = Language::ENGLISH;
        assert_eq!(english.code(), "en");
        assert_eq!(english.name(), "English");
        assert!(english.is_default());
    }

    #[test]
    fn test_french_constant() {
        let french = Language::FRENCH;
        assert_eq!(french.code(), "fr");
        assert_eq!(french.verification(), Verification::Email);
    }

    #[test]
    fn test_from_code_all_supported() {
        for code in ["en", "es", "hi", "pt", "zh", "fr"] {
            let language = Language::from_code(code).expect("Should succeed");
            assert_eq!(language.code(), code);
        }
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("de");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unsupported"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(Language::default_language(), Language::ENGLISH);
    }

    #[test]
    fn test_language_equality() {
        let lang1 = Language::ENGLISH;
        let lang2 = Language::from_code("en").unwrap();
        assert_eq!(lang1, lang2);
        assert_ne!(lang1, Language::FRENCH);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::from_code("zh").unwrap().to_string(), "zh");
    }
}
