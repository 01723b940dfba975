use crate::core::CompletionProvider;
use crate::domain::model::{
    AttemptOutcome, ChatMessage, CompletionRequest, EmailDraft, GenerationRequest, ModelAttempt,
};
use crate::utils::error::{GenerationError, ProviderError};
use std::sync::Arc;

pub const SYSTEM_INSTRUCTION: &str = "You are an email assistant. \
Generate professional email content based on user input. \
Return ONLY the email body text without any subject line or signatures. \
Format: Plain text with line breaks.";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1024;

/// 一次 fallback 流程的結果與逐一嘗試的紀錄
#[derive(Debug)]
pub struct FallbackOutcome {
    pub result: Result<EmailDraft, GenerationError>,
    pub attempts: Vec<ModelAttempt>,
}

impl FallbackOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &ModelAttempt> {
        self.attempts.iter().filter(|a| a.is_failure())
    }
}

pub fn completion_request(model: &str, request: &GenerationRequest) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(request.prompt()),
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

fn usable_content(raw: String) -> Result<String, ProviderError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyContent);
    }
    Ok(trimmed.to_string())
}

/// 依優先順序逐一嘗試模型，第一個有效回應即停止。
///
/// 每個模型只呼叫一次，且嘗試之間嚴格循序。全部失敗時只回傳最後一個錯誤。
pub async fn generate_with_fallback(
    provider: &dyn CompletionProvider,
    models: &[String],
    request: &GenerationRequest,
) -> FallbackOutcome {
    let mut attempts = Vec::with_capacity(models.len());
    let mut last_error: Option<ProviderError> = None;

    for model in models {
        tracing::info!("🤖 Trying model: {}", model);
        let completion = completion_request(model, request);

        match provider.complete(&completion).await.and_then(usable_content) {
            Ok(text) => {
                tracing::info!("✅ Success with model: {}", model);
                attempts.push(ModelAttempt {
                    model: model.clone(),
                    outcome: AttemptOutcome::Success(text.clone()),
                });
                return FallbackOutcome {
                    result: Ok(EmailDraft {
                        body: text,
                        model: model.clone(),
                    }),
                    attempts,
                };
            }
            Err(err) => {
                tracing::warn!("⚠️ Model {} failed: {}", model, err);
                attempts.push(ModelAttempt {
                    model: model.clone(),
                    outcome: AttemptOutcome::Failure(err.clone()),
                });
                last_error = Some(err);
            }
        }
    }

    let result = match last_error {
        Some(last_error) => Err(GenerationError::Exhausted {
            last_error,
            attempts: attempts.len(),
        }),
        None => Err(GenerationError::NoModels),
    };

    FallbackOutcome { result, attempts }
}

/// 注入 provider 與模型清單的 orchestrator，供 HTTP handler 共用
#[derive(Clone)]
pub struct FallbackOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    models: Arc<[String]>,
}

impl FallbackOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: Vec<String>) -> Self {
        Self {
            provider,
            models: models.into(),
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn provider_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub async fn run(&self, request: &GenerationRequest) -> FallbackOutcome {
        generate_with_fallback(self.provider.as_ref(), &self.models, request).await
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<EmailDraft, GenerationError> {
        // 失敗由 HTTP 邊界統一記錄
        self.run(request).await.result
    }
}
