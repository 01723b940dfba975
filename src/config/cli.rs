use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// 所有欄位皆可由環境變數提供（會先載入 `.env`）
#[derive(Clone, Default, Parser)]
#[command(name = "draftmail")]
#[command(about = "Drafts emails with a hosted LLM and relays them over SMTP")]
pub struct CliArgs {
    #[arg(long, env = "DRAFTMAIL_CONFIG", help = "Optional TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "BIND_ADDR")]
    pub bind_addr: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "GROQ_BASE_URL")]
    pub groq_base_url: Option<String>,

    #[arg(long = "models", env = "GROQ_MODELS", value_delimiter = ',')]
    pub models: Vec<String>,

    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    #[arg(long, env = "MAIL_FROM_NAME")]
    pub from_name: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Skip the completion API check at startup")]
    pub skip_probe: bool,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CliArgs {
    /// 覆蓋設定檔中的值；空白值視為未提供
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(bind_addr) = non_blank(&self.bind_addr) {
            config.server.bind_addr = bind_addr;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origin) = non_blank(&self.cors_origin) {
            config.server.cors_origin = origin;
        }

        if let Some(key) = non_blank(&self.groq_api_key) {
            config.completion.api_key = Some(key);
        }
        if let Some(base_url) = non_blank(&self.groq_base_url) {
            config.completion.base_url = base_url;
        }
        let models: Vec<String> = self
            .models
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if !models.is_empty() {
            config.completion.models = models;
        }

        if let Some(user) = non_blank(&self.email_user) {
            config.mail.username = Some(user);
        }
        // 密碼不做 trim
        if let Some(pass) = self.email_pass.as_ref().filter(|p| !p.is_empty()) {
            config.mail.password = Some(pass.clone());
        }
        if let Some(host) = non_blank(&self.smtp_host) {
            config.mail.smtp_host = host;
        }
        if let Some(port) = self.smtp_port {
            config.mail.smtp_port = port;
        }
        if let Some(name) = non_blank(&self.from_name) {
            config.mail.from_name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "draftmail",
            "--port",
            "8080",
            "--groq-api-key",
            "gsk_test",
            "--models",
            "m1, m2,,m3",
            "--email-user",
            "drafts@example.com",
            "--verbose",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.completion.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.completion.models, ["m1", "m2", "m3"]);
        assert_eq!(config.mail.username.as_deref(), Some("drafts@example.com"));
        assert!(args.verbose);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let args = CliArgs {
            cors_origin: Some("   ".to_string()),
            smtp_host: Some(String::new()),
            ..CliArgs::default()
        };

        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config, AppConfig::default());
    }
}
