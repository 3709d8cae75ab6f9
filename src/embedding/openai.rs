//! OpenAI API-based text embedder implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, SanadError};
use crate::vector::Vector;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI embeddings client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiEmbedderConfig {
    /// OpenAI API key.
    pub api_key: String,

    /// Embedding model identifier.
    pub model: String,

    /// Custom output dimension (only honored by the newer models).
    pub dimension: Option<usize>,

    /// Base URL of the API, overridable for compatible endpoints.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiEmbedderConfig {
    fn default() -> Self {
        OpenAiEmbedderConfig {
            api_key: String::new(),
            model: "text-embedding-ada-002".to_string(),
            dimension: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Request structure for the OpenAI embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    /// Model identifier to use for embeddings.
    model: String,
    /// Input texts to embed.
    input: Vec<String>,
    /// Optional custom dimension (only for newer models).
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

/// Response structure from the OpenAI embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Individual embedding data from the API response.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI API-based text embedder.
///
/// Requests are bounded by the configured timeout so an unreachable API
/// surfaces as an error the pipeline can degrade around instead of a hang.
///
/// # Supported Models
///
/// - `text-embedding-ada-002` - 1536 dimensions, the model the verse
///   collection is embedded with
/// - `text-embedding-3-small` - 1536 dimensions
/// - `text-embedding-3-large` - 3072 dimensions
pub struct OpenAiTextEmbedder {
    client: Client,
    config: OpenAiEmbedderConfig,
    dimension: usize,
}

impl OpenAiTextEmbedder {
    /// Create a new OpenAI embedder.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the model name is not
    /// recognized.
    pub fn new(config: OpenAiEmbedderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SanadError::invalid_config("OpenAI API key must not be empty"));
        }

        match config.model.as_str() {
            "text-embedding-ada-002" | "text-embedding-3-small" | "text-embedding-3-large" => {}
            _ => {
                return Err(SanadError::InvalidOperation(format!(
                    "Unknown OpenAI embedding model: {}. Supported models: \
                     text-embedding-ada-002, text-embedding-3-small, text-embedding-3-large",
                    config.model
                )));
            }
        }

        let dimension = config
            .dimension
            .unwrap_or_else(|| Self::default_dimension(&config.model));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SanadError::embedding(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            dimension,
        })
    }

    /// Get the default dimension for a given model.
    fn default_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextEmbedder for OpenAiTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let dimensions = if self.dimension == Self::default_dimension(&self.config.model) {
            None
        } else {
            Some(self.dimension)
        };

        let request = EmbeddingRequest {
            model: self.config.model.clone(),
            input: vec![text.to_string()],
            dimensions,
        };

        let http_response = self
            .client
            .post(self.embeddings_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SanadError::embedding(format!("OpenAI API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response
            .text()
            .await
            .map_err(|e| SanadError::embedding(format!("failed to read response text: {e}")))?;

        if !status.is_success() {
            return Err(SanadError::embedding(format!(
                "OpenAI API error (status {status}): {response_text}"
            )));
        }

        let response: EmbeddingResponse = serde_json::from_str(&response_text).map_err(|e| {
            SanadError::embedding(format!(
                "failed to parse OpenAI response: {e}. Response text: {response_text}"
            ))
        })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| SanadError::embedding("no embedding in response"))?
            .embedding;

        Ok(Vector::new(embedding))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
