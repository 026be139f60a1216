use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // OTP
    pub otp_secret: String,

    // Storage
    pub database_path: String,

    // Server
    pub port: u16,

    // Transactional mail API
    pub mail_api_base: String,
    pub mail_api_token: String,
    pub mail_from: String,

    // Twilio (SMS)
    pub twilio_api_base: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from: String,

    // Translation passthrough
    pub translation_api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // OTP - shared secret, must be at least 16 bytes
            otp_secret: std::env::var("OTP_SECRET").context("OTP_SECRET not set")?,

            // Storage
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "chirp_language.db".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // Transactional mail API
            mail_api_base: std::env::var("MAIL_API_BASE").context("MAIL_API_BASE not set")?,
            mail_api_token: std::env::var("MAIL_API_TOKEN").context("MAIL_API_TOKEN not set")?,
            mail_from: std::env::var("MAIL_FROM").context("MAIL_FROM not set")?,

            // Twilio
            twilio_api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID")
                .context("TWILIO_ACCOUNT_SID not set")?,
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_AUTH_TOKEN not set")?,
            twilio_from: std::env::var("TWILIO_PHONE_FROM").context("TWILIO_PHONE_FROM not set")?,

            // Translation passthrough
            translation_api_base: std::env::var("TRANSLATION_API_BASE")
                .unwrap_or_else(|_| "https://api.mymemory.translated.net".to_string()),
        })
    }
}
