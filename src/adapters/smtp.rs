use crate::config::MailSettings;
use crate::domain::model::{DeliveryReceipt, OutgoingEmail};
use crate::domain::ports::MailTransport;
use crate::utils::error::MailError;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use uuid::Uuid;

pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

struct ConfiguredSmtp {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// 寄件者位址無效時延後到 `send` 才回報
    from: Result<Mailbox, MailError>,
}

/// 以 lettre 實作的 SMTP 寄送。
///
/// 缺少帳號或密碼時仍可建立，但 `send` 會回傳 [`MailError::NotConfigured`]。
/// 帳號不是有效的 email 位址時同樣可以啟動，`send` 回傳 [`MailError::InvalidAddress`]。
pub struct SmtpMailTransport {
    inner: Option<ConfiguredSmtp>,
}

impl SmtpMailTransport {
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        let (username, password) = match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                (user.trim(), pass)
            }
            _ => {
                tracing::warn!("📧 EMAIL_USER / EMAIL_PASS not set, sending is disabled");
                return Ok(Self { inner: None });
            }
        };

        let from = match username.parse::<Address>() {
            Ok(address) => Ok(Mailbox::new(Some(settings.from_name.clone()), address)),
            Err(_) => {
                tracing::warn!(
                    "📧 EMAIL_USER '{}' is not an email address, sending will fail",
                    username
                );
                Err(MailError::InvalidAddress(username.to_string()))
            }
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            inner: Some(ConfiguredSmtp { transport, from }),
        })
    }

    /// 未設定帳號時使用
    pub fn disabled() -> Self {
        Self { inner: None }
    }
}

/// 組出 lettre 訊息，回傳訊息與其 Message-ID
pub fn compose(from: &Mailbox, email: &OutgoingEmail) -> Result<(Message, String), MailError> {
    let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.as_str())
        .message_id(Some(message_id.clone()));

    for to in &email.to {
        let mailbox: Mailbox = to
            .parse()
            .map_err(|_| MailError::InvalidAddress(to.clone()))?;
        builder = builder.to(mailbox);
    }

    let message = builder
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| MailError::Build(e.to_string()))?;

    Ok((message, message_id))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        let smtp = self.inner.as_ref().ok_or(MailError::NotConfigured)?;
        let from = smtp.from.as_ref().map_err(Clone::clone)?;
        let (message, message_id) = compose(from, email)?;

        let response = smtp
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        tracing::debug!("SMTP response code: {}", response.code());

        Ok(DeliveryReceipt { message_id })
    }

    fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}
