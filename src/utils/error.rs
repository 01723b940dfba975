use std::time::Duration;
use thiserror::Error;

/// 服務層級錯誤（啟動、配置、IO）
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error(transparent)]
    MailError(#[from] MailError),
}

impl AppError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::MissingConfigError { field } if field == "GROQ_API_KEY" => {
                "Set GROQ_API_KEY in the environment or in a .env file"
            }
            AppError::MissingConfigError { .. } => {
                "Provide the missing value via environment, CLI flag or config file"
            }
            AppError::InvalidConfigValueError { .. } => "Fix the reported configuration value",
            AppError::ConfigParseError { .. } => "Check the TOML syntax of the config file",
            AppError::IoError(_) => "Check that the port is free and the config file is readable",
            AppError::HttpClientError(_) => "Check the TLS setup of the host",
            AppError::MailError(_) => "Check EMAIL_USER, EMAIL_PASS and SMTP_HOST",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::IoError(_) => 2,
            _ => 1,
        }
    }
}

/// 請求欄位驗證錯誤，對應 400
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Valid prompt is required (min 5 characters)")]
    InvalidPrompt,

    #[error("At least one valid recipient is required")]
    MissingRecipients,

    #[error("Valid email content is required (min 10 characters)")]
    InvalidContent,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

/// 單一次 completion 呼叫的失敗原因
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        kind: Option<String>,
        body: Option<serde_json::Value>,
    },

    #[error("Invalid response structure: {0}")]
    MalformedResponse(String),

    #[error("Model returned empty content")]
    EmptyContent,
}

pub const GENERATION_REMEDIES: [&str; 4] = [
    "1. Verify GROQ_API_KEY in .env file",
    "2. Check account status at console.groq.com",
    "3. Try a simpler/shorter prompt",
    "4. Ensure internet connectivity",
];

impl ProviderError {
    pub fn kind(&self) -> &str {
        match self {
            ProviderError::Transport(_) => "transport",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Api { kind: Some(kind), .. } => kind.as_str(),
            ProviderError::Api { .. } => "api_error",
            ProviderError::MalformedResponse(_) => "invalid_response",
            ProviderError::EmptyContent => "empty_content",
        }
    }

    pub fn api_status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn api_data(&self) -> Option<&serde_json::Value> {
        match self {
            ProviderError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Fallback 流程的終止失敗
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("No models configured")]
    NoModels,

    #[error("All {attempts} models failed, last error: {last_error}")]
    Exhausted {
        last_error: ProviderError,
        attempts: usize,
    },
}

#[derive(Error, Debug, Clone)]
pub enum MailError {
    #[error("Email transport is not configured (set EMAIL_USER and EMAIL_PASS)")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_kind_prefers_api_type() {
        let err = ProviderError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
            kind: Some("invalid_request_error".to_string()),
            body: None,
        };
        assert_eq!(err.kind(), "invalid_request_error");
        assert_eq!(err.api_status(), Some(401));

        assert_eq!(ProviderError::EmptyContent.kind(), "empty_content");
        assert_eq!(ProviderError::EmptyContent.api_status(), None);
    }

    #[test]
    fn test_missing_api_key_suggestion() {
        let err = AppError::MissingConfigError {
            field: "GROQ_API_KEY".to_string(),
        };
        assert!(err.recovery_suggestion().contains("GROQ_API_KEY"));
        assert_eq!(err.exit_code(), 1);
    }
}
