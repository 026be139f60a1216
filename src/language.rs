//! Language-change state machine.
//!
//! Per user the flow is Idle → AwaitingVerification (code issued, not yet
//! expired) → Idle again on success or expiry. Supersession is disallowed:
//! while an unexpired code exists a new request fails with [`LanguageError::Cooldown`],
//! which doubles as the resend throttle. English commits immediately with
//! no code; French verifies over email; es/hi/pt/zh verify over SMS.
//!
//! Pending state is persisted only after the transport confirms the send,
//! and through a conditional update, so a failed delivery never leaves a
//! phantom cooldown and two racing requests cannot both issue codes.

use crate::db::Database;
use crate::delivery::{Channel, DeliveryError, EmailChannel, SmsChannel};
use crate::i18n::{strings, Language, Verification};
use crate::otp::{OtpGenerator, STEP_SECONDS};
use crate::security::constant_time_compare;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

/// Lifetime of an issued code, in milliseconds. Matches the generator's
/// time-step width.
pub const OTP_TTL_MS: i64 = STEP_SECONDS as i64 * 1000;

/// Everything that can go wrong in the language-change flow.
///
/// `Display` renders the user-facing message; variants tied to an in-flight
/// change carry the locale their message should be rendered in.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("{}", strings::UNSUPPORTED_LANGUAGE)]
    UnsupportedLanguage,

    #[error("{}", strings::ALREADY_USING)]
    AlreadyUsing,

    #[error("{}", strings::EMAIL_REQUIRED)]
    MissingEmail,

    #[error("{}", strings::PHONE_REQUIRED)]
    MissingPhone,

    #[error("{}", strings::COOLDOWN)]
    Cooldown,

    #[error("{}", strings::strings_for(*language).no_pending_request)]
    NoPendingRequest { language: Language },

    #[error("{}", strings::strings_for(*language).otp_expired)]
    CodeExpired { language: Language },

    #[error("{}", strings::strings_for(*language).invalid_otp)]
    InvalidCode { language: Language },

    #[error("{}", strings::UNAUTHORIZED)]
    UserNotFound,

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Outcome of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeRequested {
    /// The target needed no verification and is already committed.
    Committed { language: Language },
    /// A code was sent; the change awaits verification.
    CodeSent { channel: Channel, language: Language },
}

/// The language-change service: owns the store handle, the injected OTP
/// generator, and both delivery channels.
pub struct LanguageService {
    db: Database,
    otp: OtpGenerator,
    email: EmailChannel,
    sms: SmsChannel,
}

impl LanguageService {
    pub fn new(db: Database, otp: OtpGenerator, email: EmailChannel, sms: SmsChannel) -> Self {
        Self {
            db,
            otp,
            email,
            sms,
        }
    }

    /// Request a display-language change for `user_id`.
    ///
    /// Validation order: supported target, target differs from current,
    /// no unexpired code in flight, then the channel requirement of the
    /// target. Resending is this same operation with the same target.
    ///
    /// The code value never leaves the service except inside the delivery
    /// message.
    pub async fn request_change(
        &self,
        user_id: i64,
        target_code: &str,
    ) -> Result<ChangeRequested, LanguageError> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or(LanguageError::UserNotFound)?;

        let target =
            Language::from_code(target_code).map_err(|_| LanguageError::UnsupportedLanguage)?;

        if user.language == target.code() {
            return Err(LanguageError::AlreadyUsing);
        }

        let now_ms = Utc::now().timestamp_millis();
        if user.has_unexpired_code(now_ms) {
            return Err(LanguageError::Cooldown);
        }

        match target.verification() {
            Verification::None => {
                // No code involved; commits immediately and drops any
                // expired leftover pending state.
                self.db.set_language(user.id, target.code())?;
                info!("User {} switched language to {}", user.id, target);
                Ok(ChangeRequested::Committed { language: target })
            }
            Verification::Email => {
                if user.email.is_empty() {
                    return Err(LanguageError::MissingEmail);
                }
                let code = self.otp.generate_now();
                self.email.send(&user.email, &code, target).await?;
                self.persist_pending(user.id, target, &code, Channel::Email, now_ms)?;
                Ok(ChangeRequested::CodeSent {
                    channel: Channel::Email,
                    language: target,
                })
            }
            Verification::Phone => {
                let phone = user
                    .phone_number
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or(LanguageError::MissingPhone)?
                    .to_string();
                let code = self.otp.generate_now();
                self.sms.send(&phone, &code, target).await?;
                self.persist_pending(user.id, target, &code, Channel::Sms, now_ms)?;
                Ok(ChangeRequested::CodeSent {
                    channel: Channel::Sms,
                    language: target,
                })
            }
        }
    }

    /// Write the pending state, conditionally on no unexpired code existing.
    /// Losing the compare-and-swap means a concurrent request holds the
    /// cooldown; that request's code is the live one.
    fn persist_pending(
        &self,
        user_id: i64,
        target: Language,
        code: &str,
        channel: Channel,
        now_ms: i64,
    ) -> Result<(), LanguageError> {
        let wrote = self.db.begin_pending_change(
            user_id,
            target.code(),
            code,
            now_ms + OTP_TTL_MS,
            channel.as_str(),
            now_ms,
        )?;

        if !wrote {
            warn!(
                "User {}: concurrent language-change request won the pending write",
                user_id
            );
            return Err(LanguageError::Cooldown);
        }

        info!(
            "User {}: verification code issued over {} for language {}",
            user_id,
            channel.as_str(),
            target
        );
        Ok(())
    }

    /// Verify a submitted code and commit the pending language change.
    ///
    /// The code must both match the stored value (constant-time) and
    /// re-validate against the time-step window; the two checks must agree.
    /// A mismatch leaves the pending state untouched so the user can retry
    /// until expiry; an expired code clears the pending state.
    pub async fn verify_change(
        &self,
        user_id: i64,
        submitted: &str,
    ) -> Result<Language, LanguageError> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or(LanguageError::UserNotFound)?;

        let current = Language::from_code(&user.language).unwrap_or(Language::ENGLISH);

        let (stored_code, expiry, pending) = match (
            user.otp_code.as_deref(),
            user.otp_expiry,
            user.pending_language.as_deref(),
        ) {
            (Some(code), Some(expiry), Some(pending)) => (code, expiry, pending),
            _ => return Err(LanguageError::NoPendingRequest { language: current }),
        };

        let pending_language = Language::from_code(pending).unwrap_or(current);

        let now_ms = Utc::now().timestamp_millis();
        if now_ms > expiry {
            // The original code is dead; the user must request a new one.
            self.db.clear_pending(user.id)?;
            return Err(LanguageError::CodeExpired {
                language: pending_language,
            });
        }

        // Dual check: the stored value and the recomputed window must both
        // agree. Stored-value comparison pins the submission to the code
        // actually issued; recomputation rejects a tampered stored value.
        let matches_stored = constant_time_compare(submitted, stored_code);
        let matches_window = self.otp.verify_now(submitted);
        if !matches_stored || !matches_window {
            return Err(LanguageError::InvalidCode {
                language: pending_language,
            });
        }

        let committed = self.db.commit_language_change(user.id, submitted, now_ms)?;
        if !committed {
            // The pending state shifted under us (expiry sweep or a racing
            // verification already won); the checked code is no longer live.
            return Err(LanguageError::CodeExpired {
                language: pending_language,
            });
        }

        info!(
            "User {} verified language change to {}",
            user.id, pending_language
        );
        Ok(pending_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_error_messages() {
        assert_eq!(
            LanguageError::UnsupportedLanguage.to_string(),
            "Unsupported language."
        );
        assert_eq!(
            LanguageError::Cooldown.to_string(),
            "Please wait before requesting a new OTP."
        );
        assert_eq!(
            LanguageError::MissingPhone.to_string(),
            "A phone number is required for this language."
        );
    }

    #[test]
    fn test_localized_error_messages() {
        let spanish = Language::from_code("es").unwrap();
        let err = LanguageError::InvalidCode { language: spanish };
        assert_eq!(
            err.to_string(),
            "Código de verificación inválido. Inténtalo de nuevo."
        );

        let err = LanguageError::CodeExpired {
            language: Language::FRENCH,
        };
        assert!(err.to_string().starts_with("Votre code de vérification a expiré"));
    }

    #[test]
    fn test_expiry_window_matches_step() {
        assert_eq!(OTP_TTL_MS, 300_000);
    }
}
