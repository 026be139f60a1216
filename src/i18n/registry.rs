//! Language registry: single source of truth for the supported locales.
//!
//! The registry is a process-wide singleton (`OnceLock`) holding the six
//! locales the application supports, together with the verification channel
//! each one demands before it can become a user's display language.

use std::sync::OnceLock;

/// Which contact channel must be verified before a locale can be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// No code required; the change commits immediately.
    None,
    /// A code is sent to the user's email address.
    Email,
    /// A code is sent to the user's phone number.
    Phone,
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "es", "fr")
    pub code: &'static str,

    /// English name of the language (e.g., "Spanish")
    pub name: &'static str,

    /// Native name of the language (e.g., "Español")
    pub native_name: &'static str,

    /// Whether this is the default locale new users start with
    pub is_default: bool,

    /// Channel that must be verified before switching to this locale
    pub verification: Verification,
}

/// Global registry of supported locales.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global registry instance, initializing it on first call.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a locale configuration by its ISO 639-1 code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All supported locale configurations.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The default locale (the one new users start with).
    ///
    /// # Panics
    /// Panics if the registry defines no default or more than one default;
    /// either indicates a configuration error.
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// Check whether a code names a supported locale.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// The supported locale set. English commits without verification, French
/// verifies over email, the remaining four verify over SMS.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: true,
            verification: Verification::None,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_default: false,
            verification: Verification::Phone,
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            is_default: false,
            verification: Verification::Phone,
        },
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_default: false,
            verification: Verification::Phone,
        },
        LanguageConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
            is_default: false,
            verification: Verification::Phone,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_default: false,
            verification: Verification::Email,
        },
    ]
}
