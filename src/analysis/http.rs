use crate::analysis::{ContentAnalyzer, ImageAttachment};
use crate::error::{PodTrustError, Result};
use crate::types::config::AnalysisSettings;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// OpenAI-compatible chat completion endpoint used as the analysis capability.
pub struct HttpAnalyzer {
    settings: AnalysisSettings,
    api_key: String,
    client: Client,
}

impl HttpAnalyzer {
    /// Reads the API key from the configured environment variable.
    pub fn from_settings(settings: AnalysisSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PodTrustError::Capability(format!(
                    "missing credentials: set {}",
                    settings.api_key_env
                ))
            })?;
        Self::with_key(settings, api_key)
    }

    pub fn with_key(settings: AnalysisSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PodTrustError::Capability(format!("cannot build http client: {e}")))?;
        Ok(Self {
            settings,
            api_key,
            client,
        })
    }

    fn request_body(&self, prompt: &str, image: Option<&ImageAttachment>) -> Value {
        let mut content = vec![json!({ "type": "text", "text": prompt })];
        if let Some(image) = image {
            content.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.data)),
                },
            }));
        }
        json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": content }],
            "temperature": 0.2,
        })
    }
}

#[async_trait]
impl ContentAnalyzer for HttpAnalyzer {
    async fn analyze(&self, prompt: &str, image: Option<&ImageAttachment>) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        );
        debug!(%url, model = %self.settings.model, with_image = image.is_some(), "calling analysis endpoint");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt, image))
            .send()
            .await
            .map_err(|e| PodTrustError::Capability(format!("analysis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PodTrustError::Capability(format!(
                "analysis endpoint returned {status}"
            )));
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(|e| PodTrustError::Capability(format!("unreadable analysis response: {e}")))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| {
                PodTrustError::Capability("analysis response had no message content".to_string())
            })
    }
}
