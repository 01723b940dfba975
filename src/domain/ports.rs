use crate::domain::model::{CompletionRequest, DeliveryReceipt, OutgoingEmail};
use crate::utils::error::{MailError, ProviderError};
use async_trait::async_trait;

/// 依模型名稱與訊息產生文字的外部服務
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// 是否具備呼叫所需的憑證
    fn is_configured(&self) -> bool;
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError>;

    fn is_configured(&self) -> bool;
}
