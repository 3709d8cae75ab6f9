//! OpenAI chat-completions grader implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SanadError};
use crate::grading::grader::{GradeScale, Grader, parse_grade};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI chat grader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiGraderConfig {
    /// OpenAI API key.
    pub api_key: String,

    /// Chat model identifier.
    pub model: String,

    /// Base URL of the API, overridable for compatible endpoints.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Sampling temperature. Zero keeps grades as stable as the model
    /// allows.
    pub temperature: f32,
}

impl Default for OpenAiGraderConfig {
    fn default() -> Self {
        OpenAiGraderConfig {
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            temperature: 0.0,
        }
    }
}

/// Request structure for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// A single chat message.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response structure from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// One generated choice in a chat response.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Grader backed by OpenAI's chat completions API.
///
/// Each grading call is a single-message prompt asking the model to
/// answer `Score: <number>` on the requested scale. Requests are bounded
/// by the configured timeout.
pub struct OpenAiGrader {
    client: Client,
    config: OpenAiGraderConfig,
}

impl OpenAiGrader {
    /// Create a new grader.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(config: OpenAiGraderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SanadError::invalid_config("OpenAI API key must not be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SanadError::grading(format!("failed to build HTTP client: {e}")))?;

        Ok(OpenAiGrader { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Build the grading prompt for one candidate.
fn build_prompt(reference_text: &str, candidate_text: &str, scale: GradeScale) -> String {
    format!(
        "Hadith: \"{reference_text}\"\n\nQuranic Ayah: \"{candidate_text}\"\n\n\
         Only respond with a number from {} to {} for how closely this Ayah \
         relates to the Hadith. Your answer must be formatted exactly like this: \
         Score: <number>\nScore:",
        scale.min, scale.max
    )
}

#[async_trait]
impl Grader for OpenAiGrader {
    async fn grade(
        &self,
        reference_text: &str,
        candidate_text: &str,
        scale: GradeScale,
    ) -> Result<u32> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(reference_text, candidate_text, scale),
            }],
            temperature: self.config.temperature,
        };

        let http_response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SanadError::grading(format!("OpenAI API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response
            .text()
            .await
            .map_err(|e| SanadError::grading(format!("failed to read response text: {e}")))?;

        if !status.is_success() {
            return Err(SanadError::grading(format!(
                "OpenAI API error (status {status}): {response_text}"
            )));
        }

        let response: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            SanadError::grading(format!(
                "failed to parse OpenAI response: {e}. Response text: {response_text}"
            ))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SanadError::grading("no choices in response"))?;

        parse_grade(&content).ok_or_else(|| {
            SanadError::grading(format!("no grade in model response: {content:?}"))
        })
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
