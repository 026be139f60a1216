//! Localized user-facing strings.
//!
//! Strings that are rendered in the user's (or target) locale live in
//! [`LanguageStrings`]; one static instance exists per supported locale.
//! Validation messages that the service always renders in English are
//! module-level constants.
//!
//! Delivery templates carry a `{code}` placeholder filled by
//! [`render_code`] just before the message is handed to a transport.

use crate::i18n::Language;

/// All localized strings for one locale.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Acknowledgments ====================
    /// Shown after a code was sent to the user's email
    pub otp_sent_email: &'static str,

    /// Shown after a code was sent to the user's phone
    pub otp_sent_sms: &'static str,

    /// Shown when the language change commits
    pub language_switch_success: &'static str,

    // ==================== Verification Errors ====================
    /// Submitted code does not match; the user may retry
    pub invalid_otp: &'static str,

    /// The code's five-minute window has elapsed; a new request is needed
    pub otp_expired: &'static str,

    /// Verification was attempted with no change in flight
    pub no_pending_request: &'static str,

    // ==================== Delivery Templates ====================
    /// Email subject line
    pub email_subject: &'static str,

    /// Email body; `{code}` is replaced with the passcode
    pub email_body: &'static str,

    /// SMS body; `{code}` is replaced with the passcode
    pub sms_body: &'static str,
}

// Validation errors are always rendered in English, matching how the
// service reports them before a target locale is established.
pub const LANGUAGE_REQUIRED: &str = "Language is required.";
pub const OTP_REQUIRED: &str = "OTP is required.";
pub const UNSUPPORTED_LANGUAGE: &str = "Unsupported language.";
pub const ALREADY_USING: &str = "You are already using this language.";
pub const EMAIL_REQUIRED: &str = "An email address is required for this language.";
pub const PHONE_REQUIRED: &str = "A phone number is required for this language.";
pub const COOLDOWN: &str = "Please wait before requesting a new OTP.";
pub const UNAUTHORIZED: &str = "Unauthorized access.";
pub const DELIVERY_FAILED: &str = "Failed to send the verification code. Please try again.";
pub const INTERNAL_ERROR: &str = "Internal server error.";

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "A verification code has been sent to your email.",
    otp_sent_sms: "A verification code has been sent to your phone.",
    language_switch_success: "Language updated successfully.",
    invalid_otp: "Invalid verification code. Please try again.",
    otp_expired: "Your verification code has expired. Please request a new one.",
    no_pending_request: "No language change is awaiting verification.",
    email_subject: "Your verification code",
    email_body: "Your verification code is: {code}. This code expires in 5 minutes.",
    sms_body: "Your verification code is: {code}. Expires in 5 minutes.",
};

pub const SPANISH_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "Se ha enviado un código de verificación a tu correo.",
    otp_sent_sms: "Se ha enviado un código de verificación a tu teléfono.",
    language_switch_success: "Idioma actualizado correctamente.",
    invalid_otp: "Código de verificación inválido. Inténtalo de nuevo.",
    otp_expired: "Tu código de verificación ha expirado. Solicita uno nuevo.",
    no_pending_request: "No hay ningún cambio de idioma pendiente de verificación.",
    // Email templates exist only for English and French; Spanish targets
    // deliver over SMS, so these fall back to the English text.
    email_subject: "Your verification code",
    email_body: "Your verification code is: {code}. This code expires in 5 minutes.",
    sms_body: "Tu código de verificación es: {code}. Expira en 5 minutos.",
};

pub const HINDI_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "आपके ईमेल पर एक सत्यापन कोड भेजा गया है।",
    otp_sent_sms: "आपके फ़ोन पर एक सत्यापन कोड भेजा गया है।",
    language_switch_success: "भाषा सफलतापूर्वक बदल दी गई।",
    invalid_otp: "अमान्य सत्यापन कोड। कृपया पुनः प्रयास करें।",
    otp_expired: "आपका सत्यापन कोड समाप्त हो गया है। कृपया नया अनुरोध करें।",
    no_pending_request: "कोई भाषा परिवर्तन सत्यापन की प्रतीक्षा में नहीं है।",
    email_subject: "Your verification code",
    email_body: "Your verification code is: {code}. This code expires in 5 minutes.",
    sms_body: "आपका सत्यापन कोड है: {code}। 5 मिनट में समाप्त हो जाएगा।",
};

pub const PORTUGUESE_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "Um código de verificação foi enviado para o seu e-mail.",
    otp_sent_sms: "Um código de verificação foi enviado para o seu telefone.",
    language_switch_success: "Idioma atualizado com sucesso.",
    invalid_otp: "Código de verificação inválido. Tente novamente.",
    otp_expired: "Seu código de verificação expirou. Solicite um novo.",
    no_pending_request: "Nenhuma troca de idioma aguarda verificação.",
    email_subject: "Your verification code",
    email_body: "Your verification code is: {code}. This code expires in 5 minutes.",
    sms_body: "Seu código de verificação é: {code}. Expira em 5 minutos.",
};

pub const CHINESE_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "验证码已发送到您的邮箱。",
    otp_sent_sms: "验证码已发送到您的手机。",
    language_switch_success: "语言更新成功。",
    invalid_otp: "验证码无效，请重试。",
    otp_expired: "您的验证码已过期，请重新申请。",
    no_pending_request: "没有等待验证的语言更改。",
    email_subject: "Your verification code",
    email_body: "Your verification code is: {code}. This code expires in 5 minutes.",
    sms_body: "您的验证码是: {code}。5分钟后过期。",
};

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    otp_sent_email: "Un code de vérification a été envoyé à votre adresse e-mail.",
    otp_sent_sms: "Un code de vérification a été envoyé à votre téléphone.",
    language_switch_success: "Langue mise à jour avec succès.",
    invalid_otp: "Code de vérification invalide. Veuillez réessayer.",
    otp_expired: "Votre code de vérification a expiré. Veuillez en demander un nouveau.",
    no_pending_request: "Aucun changement de langue n'attend de vérification.",
    email_subject: "Votre code de vérification",
    email_body: "Votre code de vérification est: {code}. Ce code expire dans 5 minutes.",
    // French has no SMS template of its own; falls back to the English text.
    sms_body: "Your verification code is: {code}. Expires in 5 minutes.",
};

/// Strings for a locale.
pub fn strings_for(language: Language) -> &'static LanguageStrings {
    match language.code() {
        "es" => &SPANISH_STRINGS,
        "hi" => &HINDI_STRINGS,
        "pt" => &PORTUGUESE_STRINGS,
        "zh" => &CHINESE_STRINGS,
        "fr" => &FRENCH_STRINGS,
        _ => &ENGLISH_STRINGS,
    }
}

/// Fill the `{code}` placeholder in a delivery template.
pub fn render_code(template: &str, code: &str) -> String {
    template.replace("{code}", code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_for_every_locale() {
        for code in ["en", "es", "hi", "pt", "zh", "fr"] {
            let language = Language::from_code(code).unwrap();
            let strings = strings_for(language);
            assert!(!strings.language_switch_success.is_empty(), "{}", code);
            assert!(strings.sms_body.contains("{code}"), "{}", code);
        }
    }

    #[test]
    fn test_french_email_template_localized() {
        let strings = strings_for(Language::FRENCH);
        assert_eq!(strings.email_subject, "Votre code de vérification");
        assert!(strings.email_body.starts_with("Votre code"));
    }

    #[test]
    fn test_render_code_fills_placeholder() {
        let body = render_code(ENGLISH_STRINGS.sms_body, "123456");
        assert_eq!(
            body,
            "Your verification code is: 123456. Expires in 5 minutes."
        );
        assert!(!body.contains("{code}"));
    }

    #[test]
    fn test_expired_and_invalid_differ() {
        // Conflating these two would tell the user to retry a dead code.
        for code in ["en", "es", "hi", "pt", "zh", "fr"] {
            let strings = strings_for(Language::from_code(code).unwrap());
            assert_ne!(strings.invalid_otp, strings.otp_expired, "{}", code);
        }
    }
}
