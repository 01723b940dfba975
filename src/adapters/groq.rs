use crate::config::CompletionSettings;
use crate::domain::model::{ChatMessage, CompletionRequest};
use crate::domain::ports::CompletionProvider;
use crate::utils::error::{AppError, ProviderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Groq（OpenAI 相容）chat completions 客戶端
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_settings(settings: &CompletionSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::MissingConfigError {
                field: "GROQ_API_KEY".to_string(),
            })?;
        Self::new(api_key, settings.base_url.as_str())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }

    /// 以極小的請求確認金鑰與連線可用
    pub async fn probe(&self, model: &str) -> std::result::Result<(), ProviderError> {
        let request = CompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user("Test connection")],
            temperature: 0.0,
            max_tokens: 5,
        };
        self.complete(&request).await.map(|_| ())
    }
}

fn api_error(status: StatusCode, body: &str) -> ProviderError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let detail = parsed
        .as_ref()
        .and_then(|v| ApiErrorEnvelope::deserialize(v).ok())
        .map(|e| e.error);

    let (message, kind) = match detail {
        Some(detail) => (detail.message, detail.kind),
        None => (
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
            None,
        ),
    };

    let body = parsed.or_else(|| {
        (!body.is_empty()).then(|| serde_json::Value::String(body.to_string()))
    });

    ProviderError::Api {
        status: status.as_u16(),
        message,
        kind,
        body,
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<String, ProviderError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!("Calling {} with model {}", self.endpoint(), request.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(content)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
