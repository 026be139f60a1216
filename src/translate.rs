//! Ad-hoc text translation passthrough.
//!
//! Proxies client requests to the MyMemory translation API. This sits next
//! to the language-change flow but shares no state with it.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Client for the MyMemory translation API. The base URL is injectable for
/// tests.
pub struct Translator {
    client: reqwest::Client,
    api_base: String,
}

impl Translator {
    pub fn new(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }

    /// Translate `text` from `from` to `to`.
    pub async fn translate(&self, text: &str, to: &str, from: &str) -> Result<String> {
        let url = format!("{}/get", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("q", text), ("langpair", &format!("{}|{}", from, to))])
            .send()
            .await
            .context("Failed to reach the translation API")?;

        if !response.status().is_success() {
            bail!("Translation API error: {}", response.status());
        }

        let parsed: MyMemoryResponse = response
            .json()
            .await
            .context("Failed to parse translation API response")?;

        match parsed.response_data.and_then(|d| d.translated_text) {
            Some(translation) if !translation.is_empty() => Ok(translation),
            _ => bail!("Translation failed"),
        }
    }
}
