use crate::utils::error::{ProviderError, ValidationError};
use crate::utils::validation::meets_min_trimmed_chars;
use serde::{Deserialize, Serialize};

pub const MIN_PROMPT_CHARS: usize = 5;
pub const MIN_CONTENT_CHARS: usize = 10;
pub const DEFAULT_SUBJECT: &str = "AI Generated Email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 送往 completion provider 的單次請求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 已驗證的草稿請求；建立後不可變
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        if !meets_min_trimmed_chars(&prompt, MIN_PROMPT_CHARS) {
            return Err(ValidationError::InvalidPrompt);
        }
        Ok(Self { prompt })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success(String),
    Failure(ProviderError),
}

#[derive(Debug, Clone)]
pub struct ModelAttempt {
    pub model: String,
    pub outcome: AttemptOutcome,
}

impl ModelAttempt {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Failure(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub body: String,
    pub model: String,
}

/// 已驗證的寄送請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    recipients: Vec<String>,
    subject: String,
    content: String,
}

impl SendRequest {
    /// 收件者逐一去除空白，空字串略過；順序與重複項目保留
    pub fn new(
        recipients: Vec<String>,
        subject: Option<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let recipients: Vec<String> = recipients
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(ValidationError::MissingRecipients);
        }

        let content = content.into();
        if !meets_min_trimmed_chars(&content, MIN_CONTENT_CHARS) {
            return Err(ValidationError::InvalidContent);
        }

        let subject = subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        Ok(Self {
            recipients,
            subject,
            content,
        })
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 內文以 HTML 寄出，換行轉為 `<br>`，並附上純文字版本
    pub fn to_outgoing(&self) -> OutgoingEmail {
        OutgoingEmail {
            to: self.recipients.clone(),
            subject: self.subject.clone(),
            text_body: self.content.clone(),
            html_body: self.content.replace('\n', "<br>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_rejects_short_prompt() {
        assert_eq!(
            GenerationRequest::new("   hey  "),
            Err(ValidationError::InvalidPrompt)
        );
        assert_eq!(GenerationRequest::new(""), Err(ValidationError::InvalidPrompt));

        let request = GenerationRequest::new("  Write a note ").unwrap();
        assert_eq!(request.prompt(), "  Write a note ");
    }

    #[test]
    fn test_send_request_validation() {
        assert_eq!(
            SendRequest::new(vec![], None, "This is long enough"),
            Err(ValidationError::MissingRecipients)
        );
        assert_eq!(
            SendRequest::new(vec!["  ".to_string()], None, "This is long enough"),
            Err(ValidationError::MissingRecipients)
        );
        assert_eq!(
            SendRequest::new(vec!["a@example.com".to_string()], None, "  short   "),
            Err(ValidationError::InvalidContent)
        );
    }

    #[test]
    fn test_send_request_defaults_subject_and_keeps_order() {
        let request = SendRequest::new(
            vec![
                "b@example.com".to_string(),
                " a@example.com ".to_string(),
                "b@example.com".to_string(),
            ],
            Some("   ".to_string()),
            "Hello there,\nSee you soon.",
        )
        .unwrap();

        assert_eq!(
            request.recipients(),
            ["b@example.com", "a@example.com", "b@example.com"]
        );
        assert_eq!(request.subject(), DEFAULT_SUBJECT);

        let outgoing = request.to_outgoing();
        assert_eq!(outgoing.html_body, "Hello there,<br>See you soon.");
        assert_eq!(outgoing.text_body, "Hello there,\nSee you soon.");
    }
}
