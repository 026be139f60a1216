use crate::delivery::{Channel, DeliveryError};
use crate::i18n::{strings, Language};
use tracing::info;

/// SMS delivery channel backed by the Twilio Messages API.
///
/// Localized bodies exist for en/es/hi/pt/zh; anything else falls back to
/// English. The API base is injectable so tests can substitute a mock.
pub struct SmsChannel {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl SmsChannel {
    pub fn new(api_base: String, account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            account_sid,
            auth_token,
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
        let body = compose(language, code);

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("From", self.from.as_str()),
                ("To", to),
                ("Body", body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DeliveryError::new(Channel::Sms, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::new(
                Channel::Sms,
                format!("Twilio API error ({}): {}", status, body),
            ));
        }

        info!("SMS OTP sent to {}", to);
        Ok(())
    }
}

/// Localized SMS body for the verification code.
fn compose(language: Language, code: &str) -> String {
    strings::render_code(strings::strings_for(language).sms_body, code)
}
