use crate::utils::error::{GenerationError, MailError, ValidationError, GENERATION_REMEDIES};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// HTTP 邊界上的錯誤；所有錯誤回應皆為含 `error` 欄位的 JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{source}")]
    Validation {
        source: ValidationError,
        received: Option<Value>,
    },

    #[error("AI generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Email sending failed: {0}")]
    Delivery(#[from] MailError),

    #[error("Route not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal,
}

impl From<ValidationError> for ApiError {
    fn from(source: ValidationError) -> Self {
        ApiError::Validation {
            source,
            received: None,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) | ApiError::Delivery(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Validation { source, received } => {
                let mut body = Map::new();
                body.insert("error".to_string(), Value::String(source.to_string()));
                if let Some(received) = received {
                    body.insert("received".to_string(), received.clone());
                }
                Value::Object(body)
            }
            ApiError::Generation(err) => json!({
                "error": "AI generation failed",
                "details": generation_details(err),
                "solution": GENERATION_REMEDIES,
            }),
            ApiError::Delivery(err) => json!({
                "error": "Email sending failed",
                "details": err.to_string(),
            }),
            ApiError::NotFound | ApiError::MethodNotAllowed | ApiError::Internal => {
                json!({ "error": self.to_string() })
            }
        }
    }
}

fn generation_details(err: &GenerationError) -> Value {
    match err {
        GenerationError::NoModels => json!({
            "message": err.to_string(),
            "type": "configuration",
        }),
        GenerationError::Exhausted { last_error, .. } => {
            let mut details = Map::new();
            details.insert("message".to_string(), Value::String(last_error.to_string()));
            details.insert("type".to_string(), Value::String(last_error.kind().to_string()));
            if let Some(status) = last_error.api_status() {
                details.insert("apiStatus".to_string(), Value::from(status));
            }
            if let Some(data) = last_error.api_data() {
                details.insert("apiData".to_string(), data.clone());
            }
            Value::Object(details)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ {} {}", status, self);
        } else {
            tracing::debug!("Rejected request ({}): {}", status, self);
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ProviderError;

    #[test]
    fn test_validation_body_echoes_received() {
        let err = ApiError::Validation {
            source: ValidationError::InvalidPrompt,
            received: Some(json!("hey")),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body(),
            json!({"error": "Valid prompt is required (min 5 characters)", "received": "hey"})
        );

        let err = ApiError::from(ValidationError::MissingRecipients);
        assert_eq!(
            err.body(),
            json!({"error": "At least one valid recipient is required"})
        );
    }

    #[test]
    fn test_generation_body_carries_last_error() {
        let err = ApiError::Generation(GenerationError::Exhausted {
            last_error: ProviderError::Api {
                status: 429,
                message: "Rate limit reached".to_string(),
                kind: Some("tokens".to_string()),
                body: Some(json!({"error": {"message": "Rate limit reached"}})),
            },
            attempts: 3,
        });

        let body = err.body();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "AI generation failed");
        assert_eq!(body["details"]["type"], "tokens");
        assert_eq!(body["details"]["apiStatus"], 429);
        assert_eq!(body["details"]["apiData"]["error"]["message"], "Rate limit reached");
        assert_eq!(body["solution"].as_array().unwrap().len(), 4);
        assert!(body.get("email").is_none());
    }

    #[test]
    fn test_delivery_body() {
        let err = ApiError::Delivery(MailError::Smtp("connection refused".to_string()));
        assert_eq!(
            err.body(),
            json!({"error": "Email sending failed", "details": "SMTP error: connection refused"})
        );
    }

    #[test]
    fn test_internal_body_hides_details() {
        assert_eq!(
            ApiError::Internal.body(),
            json!({"error": "Internal server error"})
        );
        assert_eq!(ApiError::NotFound.body(), json!({"error": "Route not found"}));
    }
}
