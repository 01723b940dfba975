pub mod fallback;

pub use crate::domain::model::{EmailDraft, GenerationRequest, ModelAttempt};
pub use crate::domain::ports::{CompletionProvider, MailTransport};
pub use crate::utils::error::Result;
