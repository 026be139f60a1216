//! Internationalization (i18n) module.
//!
//! Everything locale-related lives here: the registry of supported locales,
//! the validated `Language` type, and the localized user-facing strings
//! (including the OTP delivery templates).
//!
//! # Architecture
//!
//! - `registry`: single source of truth for supported locales and the
//!   verification channel each one requires
//! - `language`: validated `Language` type constructed against the registry
//! - `strings`: per-locale message and template text

mod language;
mod registry;
pub mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry, Verification};
pub use strings::{strings_for, LanguageStrings};
