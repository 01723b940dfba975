pub mod cli;
pub mod toml_config;

use crate::adapters::groq::DEFAULT_BASE_URL;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub use cli::CliArgs;
pub use toml_config::TomlConfig;

pub const DEFAULT_MODELS: [&str; 3] = ["llama3-8b-8192", "llama3-70b-8192", "mixtral-8x7b-32768"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
    pub cors_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .map_err(|e| AppError::InvalidConfigValueError {
                field: "BIND_ADDR".to_string(),
                value: self.bind_addr.clone(),
                reason: format!("{}", e),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn cors_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(&self.cors_origin).map_err(|e| AppError::InvalidConfigValueError {
            field: "CORS_ORIGIN".to_string(),
            value: self.cors_origin.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: Vec<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            from_name: "AI Email Assistant".to_string(),
        }
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "••••"))
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl MailSettings {
    pub fn credentials_present(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.trim().is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// 啟動時建立一次，之後注入 provider 與 transport
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub completion: CompletionSettings,
    pub mail: MailSettings,
}

impl AppConfig {
    /// 預設值 → TOML 檔 → 環境變數 / CLI 參數
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => {
                tracing::info!("📄 Loading config file: {}", path.display());
                TomlConfig::from_file(path)?.into_app_config()
            }
            None => AppConfig::default(),
        };
        args.apply_to(&mut config);
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        let api_key = validate_required_field("GROQ_API_KEY", &self.completion.api_key)?;
        if api_key.trim().is_empty() {
            return Err(AppError::MissingConfigError {
                field: "GROQ_API_KEY".to_string(),
            });
        }

        validate_url("GROQ_BASE_URL", &self.completion.base_url)?;
        validate_positive_number("GROQ_MODELS", self.completion.models.len(), 1)?;
        for model in &self.completion.models {
            validate_non_empty_string("GROQ_MODELS", model)?;
        }

        validate_range("PORT", self.server.port, 1, u16::MAX)?;
        self.server.socket_addr()?;
        self.server.cors_header()?;

        validate_non_empty_string("SMTP_HOST", &self.mail.smtp_host)?;
        validate_range("SMTP_PORT", self.mail.smtp_port, 1, u16::MAX)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

/// 只顯示最後四個字元
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("••••{}", tail)
}
