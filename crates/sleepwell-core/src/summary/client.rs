//! Text-generation client for the Generative Language `generateContent` API.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::credentials;
use crate::error::SummaryError;
use crate::storage::SummaryConfig;

/// Anything that turns a prompt into markdown text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, SummaryError>> + Send;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    /// `timeout_secs` of 0 disables the request timeout.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, SummaryError> {
        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        ))?;
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Build from config, resolving the API key from the environment or keyring.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummaryError> {
        let (api_key, source) = credentials::resolve_api_key(&config.api_key_env).ok_or_else(|| {
            SummaryError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            }
        })?;
        tracing::debug!(?source, model = %config.model, "summary client configured");
        Self::new(&config.base_url, &config.model, api_key, config.timeout_secs)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: GenerateResponse = resp.json().await?;
        let text: String = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SummaryError::EmptyResponse);
        }
        Ok(text)
    }
}
