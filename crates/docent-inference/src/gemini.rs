//! Gemini inference backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use docent_core::{
    defaults, ChatBackend, ChatOutcome, ChatTurn, EmbeddingBackend, Error, Result, Settings,
    ToolSpec,
};

use crate::types::*;

/// Embedding task type for search queries.
const TASK_RETRIEVAL_QUERY: &str = "RETRIEVAL_QUERY";

/// Embedding task type for documents at ingestion time.
const TASK_RETRIEVAL_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language REST API.
    pub base_url: String,
    /// API key, passed as the `key` query parameter.
    pub api_key: String,
    /// Embedding model name (without the `models/` prefix).
    pub embed_model: String,
    /// Generation model name.
    pub gen_model: String,
    /// Expected embedding dimension.
    pub embed_dimension: usize,
    /// Timeout for embedding requests (seconds).
    pub embed_timeout_secs: u64,
    /// Timeout for generation requests (seconds).
    pub gen_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: String::new(),
            embed_model: defaults::EMBED_MODEL.to_string(),
            gen_model: defaults::GEN_MODEL.to_string(),
            embed_dimension: defaults::EMBED_DIMENSION,
            embed_timeout_secs: defaults::EMBED_TIMEOUT_SECS,
            gen_timeout_secs: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Build a config from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.gemini_base_url.clone(),
            api_key: settings.gemini_api_key.clone(),
            embed_model: settings.gemini_embed_model.clone(),
            gen_model: settings.gemini_model.clone(),
            ..Default::default()
        }
    }
}

/// Gemini inference backend.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            embed_model = %config.embed_model,
            gen_model = %config.gen_model,
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build the URL for a model method, with the API key attached.
    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            model,
            method,
            self.config.api_key
        )
    }

    /// Decode the API error envelope from a non-2xx response.
    async fn api_error(response: reqwest::Response) -> String {
        let status = response.status();
        let message = response
            .json::<GeminiErrorResponse>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("Gemini returned {}: {}", status, message)
    }

    /// Call `embedContent` with a task-type hint.
    async fn embed(&self, text: &str, task_type: &str) -> Result<Vec<f32>> {
        debug!(
            model = %self.config.embed_model,
            task_type,
            text_len = text.len(),
            "Embedding text"
        );

        let request = EmbedContentRequest {
            model: format!("models/{}", self.config.embed_model),
            content: EmbedContent {
                parts: vec![TextPart {
                    text: text.to_string(),
                }],
            },
            task_type: Some(task_type.to_string()),
        };

        let response = self
            .client
            .post(self.model_url(&self.config.embed_model, "embedContent"))
            .timeout(Duration::from_secs(self.config.embed_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(Self::api_error(response).await));
        }

        let result: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse response: {}", e)))?;

        let values = result.embedding.values;
        if values.len() != self.config.embed_dimension {
            return Err(Error::Embedding(format!(
                "Model {} returned a {}-dimension vector, expected {}",
                self.config.embed_model,
                values.len(),
                self.config.embed_dimension
            )));
        }

        Ok(values)
    }

    /// Map a conversation turn onto a wire content block.
    fn content_from_turn(turn: &ChatTurn) -> Content {
        match turn {
            ChatTurn::User { text } => Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(text.clone())],
            },
            ChatTurn::Model { text } => Content {
                role: Some("model".to_string()),
                parts: vec![Part::text(text.clone())],
            },
            ChatTurn::ModelToolCall { name, arguments } => Content {
                role: Some("model".to_string()),
                parts: vec![Part {
                    function_call: Some(FunctionCall {
                        name: name.clone(),
                        args: arguments.clone(),
                    }),
                    ..Default::default()
                }],
            },
            ChatTurn::ToolResult { name, content } => Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    function_response: Some(FunctionResponse {
                        name: name.clone(),
                        response: serde_json::json!({ "content": content }),
                    }),
                    ..Default::default()
                }],
            },
        }
    }
}

#[async_trait]
impl EmbeddingBackend for GeminiBackend {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text, TASK_RETRIEVAL_QUERY).await
    }

    async fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text, TASK_RETRIEVAL_DOCUMENT).await
    }

    fn dimension(&self) -> usize {
        self.config.embed_dimension
    }

    fn model_name(&self) -> &str {
        &self.config.embed_model
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn chat(&self, history: &[ChatTurn], tools: &[ToolSpec]) -> Result<ChatOutcome> {
        debug!(
            model = %self.config.gen_model,
            turns = history.len(),
            tools = tools.len(),
            "Generating chat response"
        );

        let request = GenerateContentRequest {
            contents: history.iter().map(Self::content_from_turn).collect(),
            tools: if tools.is_empty() {
                None
            } else {
                Some(vec![Tool {
                    function_declarations: tools
                        .iter()
                        .map(|t| FunctionDeclaration {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.parameters.clone(),
                        })
                        .collect(),
                }])
            },
        };

        let response = self
            .client
            .post(self.model_url(&self.config.gen_model, "generateContent"))
            .timeout(Duration::from_secs(self.config.gen_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Inference(Self::api_error(response).await));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| Error::Inference("Model returned no candidates".to_string()))?;

        // A function call wins over any accompanying text.
        for part in &content.parts {
            if let Some(call) = &part.function_call {
                return Ok(ChatOutcome::ToolCall {
                    name: call.name.clone(),
                    arguments: call.args.clone(),
                });
            }
        }

        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(Error::Inference(
                "Model response contained no text parts".to_string(),
            ));
        }

        Ok(ChatOutcome::Text(text))
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}
