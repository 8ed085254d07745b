use anyhow::{Context, Result};

use crate::config::Config;

const FALLBACK_REPLY: &str =
    "Sorry, the tutoring assistant is unavailable right now. Please try again later.";

/// Thin proxy in front of the Gemini generateContent endpoint. The handler
/// never surfaces transport failures to the student; it answers with a
/// canned apology instead.
pub struct ChatService<'a> {
    config: &'a Config,
}

impl<'a> ChatService<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub async fn reply(&self, message: &str) -> String {
        match self.ask_model(message).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Chat backend call failed: {:#}", err);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn ask_model(&self, message: &str) -> Result<String> {
        if self.config.gemini_api_key.is_empty() {
            anyhow::bail!("chat API key is not configured");
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": message }]
            }]
        });

        let response = client
            .post(&self.config.gemini_api_url)
            .query(&[("key", self.config.gemini_api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to reach chat backend")?;

        if !response.status().is_success() {
            anyhow::bail!("chat backend returned status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("unexpected chat backend response shape"))?
            .to_string();

        Ok(text)
    }
}
