use crate::delivery::{Channel, DeliveryError};
use crate::i18n::{strings, Language};
use tracing::info;

/// Email delivery channel.
///
/// Composes a localized subject and body (French and English templates
/// exist; English is the fallback) and posts the message to the
/// transactional-mail HTTP API. The base URL is injectable so tests can
/// point it at a mock server.
pub struct EmailChannel {
    client: reqwest::Client,
    api_base: String,
    api_token: String,
    from: String,
}

#[derive(serde::Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl EmailChannel {
    pub fn new(api_base: String, api_token: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_token,
            from,
        }
    }

    /// Send a verification code to `to`, localized for `language`.
    ///
    /// # Errors
    /// Returns [`DeliveryError`] if the transport cannot be reached or
    /// rejects the message; the code must then not be treated as issued.
    pub async fn send(
        &self,
        to: &str,
        code: &str,
        language: Language,
    ) -> Result<(), DeliveryError> {
        let (subject, body) = compose(language, code);

        let url = format!("{}/v1/send", self.api_base);
        let request = SendMailRequest {
            from: &self.from,
            to,
            subject: &subject,
            text: &body,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DeliveryError::new(Channel::Email, format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::new(
                Channel::Email,
                format!("mail API error ({}): {}", status, body),
            ));
        }

        // Never log the code itself.
        info!("Email OTP sent to {}", to);
        Ok(())
    }
}

/// Localized subject and body for the verification email.
fn compose(language: Language, code: &str) -> (String, String) {
    let localized = strings::strings_for(language);
    (
        localized.email_subject.to_string(),
        strings::render_code(localized.email_body, code),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_french() {
        let (subject, body) = compose(Language::FRENCH, "483920");
        assert_eq!(subject, "Votre code de vérification");
        assert!(body.contains("483920"));
        assert!(body.contains("5 minutes"));
    }

    #[test]
    fn test_compose_falls_back_to_english() {
        // Only French and English email templates exist.
        let spanish = Language::from_code("es").unwrap();
        let (subject, body) = compose(spanish, "483920");
        assert_eq!(subject, "Your verification code");
        assert!(body.starts_with("Your verification code is: 483920"));
    }
}
