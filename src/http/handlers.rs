use crate::domain::model::{GenerationRequest, SendRequest};
use crate::http::error::ApiError;
use crate::http::routes::AppState;
use crate::utils::error::ValidationError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

#[derive(Debug, Deserialize)]
pub struct GenerateEmailBody {
    /// 保留原始 JSON 值，驗證失敗時原樣回傳給呼叫端
    #[serde(default)]
    pub prompt: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateEmailResponse {
    pub email: String,
}

/// 欄位型別錯誤時回傳驗證訊息，而非反序列化錯誤
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SendEmailBody {
    pub recipients: Option<Value>,
    pub subject: Option<Value>,
    pub content: Option<Value>,
}

impl SendEmailBody {
    /// 非陣列的 recipients 與非字串的 content 視同缺少；陣列中的非字串項目略過
    pub fn into_request(self) -> Result<SendRequest, ValidationError> {
        let recipients: Vec<String> = match self.recipients {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => return Err(ValidationError::MissingRecipients),
        };
        let subject = match self.subject {
            Some(Value::String(subject)) => Some(subject),
            _ => None,
        };
        let content = match self.content {
            Some(Value::String(content)) => content,
            _ => String::new(),
        };

        SendRequest::new(recipients, subject, content)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub success: bool,
    pub message_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub groq: String,
    pub email: String,
}

fn configured(flag: bool) -> String {
    let value = if flag { "configured" } else { "missing" };
    value.to_string()
}

fn malformed(rejection: JsonRejection) -> ApiError {
    ValidationError::MalformedBody(rejection.body_text()).into()
}

pub async fn root() -> &'static str {
    "AI Email Sender Backend is running!"
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        groq: configured(state.orchestrator.provider_configured()),
        email: configured(state.mailer.is_configured()),
    })
}

pub async fn generate_email(
    State(state): State<AppState>,
    payload: Result<Json<GenerateEmailBody>, JsonRejection>,
) -> Result<Json<GenerateEmailResponse>, ApiError> {
    let Json(body) = payload.map_err(malformed)?;

    let request = match body.prompt.as_ref().and_then(Value::as_str) {
        Some(prompt) => GenerationRequest::new(prompt),
        None => Err(ValidationError::InvalidPrompt),
    }
    .map_err(|source| ApiError::Validation {
        source,
        received: body.prompt.clone(),
    })?;

    let draft = state.orchestrator.generate(&request).await?;
    tracing::info!(
        "✉️ Draft generated by {} ({} chars)",
        draft.model,
        draft.body.chars().count()
    );

    Ok(Json(GenerateEmailResponse { email: draft.body }))
}

pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(body) = payload.map_err(malformed)?;

    let request = body.into_request()?;

    let receipt = state.mailer.send(&request.to_outgoing()).await?;
    tracing::info!(
        "📧 Email sent to {} recipient(s), message id {}",
        request.recipients().len(),
        receipt.message_id
    );

    Ok(Json(SendEmailResponse {
        success: true,
        message_id: receipt.message_id,
    }))
}

/// CORS preflight；帶有 Origin 的 preflight 會先被 CorsLayer 回應
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound
}

pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("🔥 Server error: {}", detail);

    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_response_is_generic_500() {
        let response = panic_response(Box::new("secret internals".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_send_body_tolerates_missing_fields() {
        let body: SendEmailBody = serde_json::from_str("{}").unwrap();
        assert!(body.recipients.is_none());
        assert!(body.content.is_none());
        assert_eq!(body.into_request(), Err(ValidationError::MissingRecipients));
    }

    #[test]
    fn test_send_body_type_mismatches_map_to_validation_errors() {
        let body: SendEmailBody = serde_json::from_value(serde_json::json!({
            "recipients": "ann@example.com",
            "content": "Plenty of content here"
        }))
        .unwrap();
        assert_eq!(body.into_request(), Err(ValidationError::MissingRecipients));

        let body: SendEmailBody = serde_json::from_value(serde_json::json!({
            "recipients": ["ann@example.com"],
            "content": 12345
        }))
        .unwrap();
        assert_eq!(body.into_request(), Err(ValidationError::InvalidContent));

        let body: SendEmailBody = serde_json::from_value(serde_json::json!({
            "recipients": ["ann@example.com", 7, " "],
            "subject": 42,
            "content": "Plenty of content here"
        }))
        .unwrap();
        let request = body.into_request().unwrap();
        assert_eq!(request.recipients(), ["ann@example.com"]);
        assert_eq!(request.subject(), "AI Generated Email");
    }
}
