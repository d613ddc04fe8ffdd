//! Gemini implementation of the `JobModel` trait.
//!
//! Talks to the Google Generative Language REST API. The model receives a
//! filled template and returns either free text (translation) or a JSON
//! array of records (extraction).

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::models::parse_records;
use crate::prompts::PromptSet;
use crate::traits::JobModel;
use crate::types::JobRecord;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed model client.
///
/// The API key is held in a [`SecretString`] so it never appears in debug
/// output or error messages; it is exposed only when building the request
/// URL.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    prompts: PromptSet,
}

impl GeminiModel {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>, prompts: PromptSet) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client"),
            api_key: SecretString::from(api_key.into()),
            model: "gemini-2.0-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            prompts,
        }
    }

    /// Create from the `GOOGLE_API_KEY` environment variable.
    pub fn from_env(prompts: PromptSet) -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| ExtractionError::Model("GOOGLE_API_KEY not set".into()))?;
        Ok(Self::new(api_key, prompts))
    }

    /// Set the model name (default: gemini-2.0-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionError::Model(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Model(
                format!("Gemini API error {}: {}", status, body).into(),
            ));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Model(Box::new(e)))?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ExtractionError::Model("empty Gemini response".into()))
    }
}

#[async_trait]
impl JobModel for GeminiModel {
    async fn translate(&self, text: &str) -> Result<String> {
        let prompt = PromptSet::fill(&self.prompts.translation, text);
        self.generate(&prompt).await
    }

    async fn extract(&self, text: &str) -> Result<Vec<JobRecord>> {
        let prompt = PromptSet::fill(&self.prompts.extraction, text);
        let completion = self.generate(&prompt).await?;
        parse_records(&completion)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}
