//! OTP-gated language-change service for the Chirp micro-blogging backend.
//!
//! A user switching their display language to a locale that requires
//! verification receives a one-time passcode over email (French) or SMS
//! (Spanish, Hindi, Portuguese, Chinese) and must confirm it within five
//! minutes before the change commits. English commits immediately.

pub mod config;
pub mod db;
pub mod delivery;
pub mod i18n;
pub mod language;
pub mod otp;
pub mod security;
pub mod server;
pub mod translate;
