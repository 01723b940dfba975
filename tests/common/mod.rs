#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::HeaderValue;
use draftmail::domain::model::{CompletionRequest, DeliveryReceipt, OutgoingEmail};
use draftmail::domain::ports::{CompletionProvider, MailTransport};
use draftmail::utils::error::{MailError, ProviderError};
use draftmail::{build_router, AppState, FallbackOrchestrator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ORIGIN: &str = "http://localhost:3000";

#[derive(Default)]
pub struct FakeProvider {
    replies: HashMap<String, Result<String, ProviderError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn reply(mut self, model: &str, result: Result<&str, ProviderError>) -> Self {
        self.replies
            .insert(model.to_string(), result.map(|s| s.to_string()));
        self
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(request.model.clone());
        self.replies
            .get(&request.model)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::Transport("no reply scripted".to_string())))
    }

    fn is_configured(&self) -> bool {
        true
    }
}

pub struct FakeMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    failure: Option<MailError>,
}

impl FakeMailer {
    pub fn ok() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(err: MailError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(err),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(DeliveryReceipt {
                message_id: format!("<fake-{}@example.com>", self.sent.lock().unwrap().len()),
            }),
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}

pub fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// 在隨機埠啟動服務，回傳 base URL
pub async fn spawn_app(
    provider: Arc<dyn CompletionProvider>,
    models: Vec<String>,
    mailer: Arc<dyn MailTransport>,
) -> String {
    let state = AppState::new(FallbackOrchestrator::new(provider, models), mailer);
    let router = build_router(state, HeaderValue::from_static(ORIGIN));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}
