use crate::config::{AppConfig, CompletionSettings, MailSettings, ServerSettings};
use crate::utils::error::{AppError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 設定檔格式：`[server]`、`[completion]`、`[mail]` 皆為選填
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSettings>,
    pub completion: Option<CompletionSettings>,
    pub mail: Option<MailSettings>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GROQ_API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigParseError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_app_config(self) -> AppConfig {
        AppConfig {
            server: self.server.unwrap_or_default(),
            completion: self.completion.unwrap_or_default(),
            mail: self.mail.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[server]
port = 8088

[completion]
models = ["llama3-70b-8192"]
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_app_config();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.completion.models, ["llama3-70b-8192"]);
        assert_eq!(config.completion.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.mail, MailSettings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DRAFTMAIL_TEST_SMTP_USER", "drafts@example.com");

        let toml_content = r#"
[mail]
username = "${DRAFTMAIL_TEST_SMTP_USER}"
password = "${DRAFTMAIL_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mail = config.mail.unwrap();
        assert_eq!(mail.username.as_deref(), Some("drafts@example.com"));
        assert_eq!(mail.password.as_deref(), Some("${DRAFTMAIL_TEST_UNSET_VAR}"));

        std::env::remove_var("DRAFTMAIL_TEST_SMTP_USER");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = TomlConfig::from_toml_str("[server\nport = 1");
        assert!(matches!(result, Err(AppError::ConfigParseError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
cors_origin = "https://mail.example.com"

[mail]
smtp_host = "smtp.example.com"
smtp_port = 2525
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path())
            .unwrap()
            .into_app_config();
        assert_eq!(config.server.cors_origin, "https://mail.example.com");
        assert_eq!(config.mail.smtp_host, "smtp.example.com");
        assert_eq!(config.mail.smtp_port, 2525);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TomlConfig::from_file("/nonexistent/draftmail.toml");
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
