use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_API_URL;
use crate::models::channel::{AllowList, DEFAULT_ALLOWED_CONTEXTS};

/// How the bot receives Telegram updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramMode {
    Polling,
    Webhook,
}

impl FromStr for TelegramMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polling" => Ok(TelegramMode::Polling),
            "webhook" => Ok(TelegramMode::Webhook),
            other => bail!("TELEGRAM_MODE must be 'polling' or 'webhook', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub allowed_contexts: AllowList,
    pub telegram_mode: TelegramMode,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    /// Bearer token for the order log API; the API is closed when unset.
    pub orders_api_token: Option<String>,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let telegram_mode: TelegramMode = optional_env("TELEGRAM_MODE")
            .unwrap_or_else(|| "polling".to_string())
            .parse()?;
        let webhook_url = optional_env("TELEGRAM_WEBHOOK_URL");
        let webhook_secret = optional_env("TELEGRAM_WEBHOOK_SECRET");
        check_webhook_settings(telegram_mode, webhook_url.as_deref(), webhook_secret.as_deref())?;

        Ok(Config {
            telegram_bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: optional_env("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            allowed_contexts: optional_env("ALLOWED_CONTEXTS")
                .as_deref()
                .unwrap_or(DEFAULT_ALLOWED_CONTEXTS)
                .parse::<AllowList>()
                .context("ALLOWED_CONTEXTS must be a comma-separated list of chat_id:thread_id")?,
            telegram_mode,
            webhook_url,
            webhook_secret,
            orders_api_token: optional_env("ORDERS_API_TOKEN"),
            host: optional_env("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Webhook mode needs a public URL and a secret token; without the secret anyone
/// could post forged updates.
fn check_webhook_settings(
    mode: TelegramMode,
    url: Option<&str>,
    secret: Option<&str>,
) -> Result<()> {
    if mode != TelegramMode::Webhook {
        return Ok(());
    }
    if url.is_none() {
        bail!("TELEGRAM_WEBHOOK_URL is required when TELEGRAM_MODE=webhook");
    }
    if secret.is_none() {
        bail!("TELEGRAM_WEBHOOK_SECRET is required when TELEGRAM_MODE=webhook");
    }
    Ok(())
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_mode_parses_case_insensitively() {
        assert_eq!("Polling".parse::<TelegramMode>().unwrap(), TelegramMode::Polling);
        assert_eq!(" webhook ".parse::<TelegramMode>().unwrap(), TelegramMode::Webhook);
    }

    #[test]
    fn test_webhook_mode_requires_url_and_secret() {
        let err = check_webhook_settings(TelegramMode::Webhook, Some("https://bot"), None)
            .unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_WEBHOOK_SECRET"));

        let err = check_webhook_settings(TelegramMode::Webhook, None, Some("s3cret")).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_WEBHOOK_URL"));

        assert!(
            check_webhook_settings(TelegramMode::Webhook, Some("https://bot"), Some("s3cret"))
                .is_ok()
        );
    }

    #[test]
    fn test_polling_mode_needs_no_webhook_settings() {
        assert!(check_webhook_settings(TelegramMode::Polling, None, None).is_ok());
    }

    #[test]
    fn test_telegram_mode_rejects_unknown() {
        let err = "push".parse::<TelegramMode>().unwrap_err();
        assert!(err.to_string().contains("'push'"));
    }
}
