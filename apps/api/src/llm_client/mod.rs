/// LLM Client — the single point of entry for all Gemini API calls.
///
/// Every model interaction goes through the `TextGenerator` trait so the
/// evaluation pipeline never depends on a concrete HTTP client.
///
/// Generation parameters and safety thresholds are fixed constants; only the
/// credential, model name and endpoint come from configuration.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const TEMPERATURE: f32 = 0.4;
const TOP_P: f32 = 1.0;
const TOP_K: u32 = 32;
const MAX_OUTPUT_TOKENS: u32 = 4096;
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by safety filters: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-in/text-out model. Implemented by `GeminiClient`; stubbed in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Everything needed to construct a `GeminiClient`.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub generation: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate that carries any text.
    pub fn text(&self) -> Option<String> {
        self.candidates.iter().find_map(|candidate| {
            let text: String = candidate
                .content
                .as_ref()?
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect();
            (!text.is_empty()).then_some(text)
        })
    }

    fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. One request per call, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            settings,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let request_body = build_request(prompt, self.settings.generation);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        if let Some(reason) = response.block_reason() {
            return Err(LlmError::Blocked(reason.to_string()));
        }
        response.text().ok_or_else(|| {
            let reasons: Vec<&str> = response
                .candidates
                .iter()
                .filter_map(|c| c.finish_reason.as_deref())
                .collect();
            warn!("LLM returned no text (finish reasons: {reasons:?})");
            LlmError::EmptyContent
        })
    }
}

fn build_request(prompt: &str, generation: GenerationConfig) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: generation,
        safety_settings: HARM_CATEGORIES
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: SAFETY_THRESHOLD,
            })
            .collect(),
    }
}

/// Strips a ```json or bare ``` fence around a model reply. A missing closing
/// fence leaves the rest of the reply in place.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let body = body.trim_start();
    body.strip_suffix("```").map_or(body, str::trim)
}
