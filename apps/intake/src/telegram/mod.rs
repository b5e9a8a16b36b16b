//! Telegram Bot API client: receives order messages and posts replies.
//!
//! Only the handful of methods the intake bot needs are wrapped here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::models::channel::ChannelIdentity;

pub mod dispatch;
pub mod polling;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Long-poll window for `getUpdates`, in seconds.
pub const POLL_TIMEOUT_SECS: u64 = 30;
// Must outlive the long-poll window.
const REQUEST_TIMEOUT_SECS: u64 = POLL_TIMEOUT_SECS + 30;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error: {0}")]
    Api(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub message_thread_id: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl Message {
    pub fn channel(&self) -> ChannelIdentity {
        ChannelIdentity::new(self.chat.id, self.message_thread_id)
    }
}

/// Where a reply goes: the originating channel, optionally quoting a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    pub channel: ChannelIdentity,
    pub reply_to: Option<i64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Reply capability
// ────────────────────────────────────────────────────────────────────────────

/// Sends a reply back to the channel an order came from. Fire-and-forget:
/// callers log failures and move on.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn deliver(&self, target: &ReplyTarget, text: &str) -> Result<(), TelegramError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Result<Self, TelegramError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: format!("{TELEGRAM_API_URL}/bot{token}"),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, TelegramError> {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(&params)
            .send()
            .await?
            .json()
            .await?;
        into_result(response)
    }

    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        self.request(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, target: &ReplyTarget, text: &str) -> Result<(), TelegramError> {
        let _: Message = self
            .request("sendMessage", send_message_params(target, text))
            .await?;
        debug!("Reply sent to {}", target.channel);
        Ok(())
    }

    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), TelegramError> {
        let mut params = json!({ "url": url, "allowed_updates": ["message"] });
        if let Some(secret) = secret {
            params["secret_token"] = json!(secret);
        }
        let _: bool = self.request("setWebhook", params).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self.request("deleteWebhook", json!({})).await?;
        Ok(())
    }
}

#[async_trait]
impl ReplySink for TelegramClient {
    async fn deliver(&self, target: &ReplyTarget, text: &str) -> Result<(), TelegramError> {
        self.send_message(target, text).await
    }
}

fn send_message_params(target: &ReplyTarget, text: &str) -> serde_json::Value {
    let mut params = json!({
        "chat_id": target.channel.chat_id,
        "text": text,
    });
    if target.channel.thread_id != 0 {
        params["message_thread_id"] = json!(target.channel.thread_id);
    }
    if let Some(message_id) = target.reply_to {
        params["reply_parameters"] = json!({
            "message_id": message_id,
            "allow_sending_without_reply": true,
        });
    }
    params
}

fn into_result<T>(response: ApiResponse<T>) -> Result<T, TelegramError> {
    match (response.ok, response.result) {
        (true, Some(result)) => Ok(result),
        _ => Err(TelegramError::Api(
            response
                .description
                .unwrap_or_else(|| "no result in response".to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_with_thread_maps_to_channel() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 55,
                "chat": {"id": -1002387655137, "type": "supergroup"},
                "message_thread_id": 9,
                "text": "Ленина 5"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.channel(), ChannelIdentity::new(-1002387655137, Some(9)));
        assert_eq!(message.text.as_deref(), Some("Ленина 5"));
    }

    #[test]
    fn test_message_without_thread_uses_zero() {
        let json = r#"{"message_id": 1, "chat": {"id": 42}}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.channel().thread_id, 0);
        assert!(message.text.is_none());
    }

    #[test]
    fn test_send_params_in_thread_with_reply() {
        let target = ReplyTarget {
            channel: ChannelIdentity::new(-100, Some(9)),
            reply_to: Some(55),
        };
        let params = send_message_params(&target, "ok");
        assert_eq!(params["chat_id"], -100);
        assert_eq!(params["message_thread_id"], 9);
        assert_eq!(params["reply_parameters"]["message_id"], 55);
        assert_eq!(params["text"], "ok");
    }

    #[test]
    fn test_send_params_outside_thread() {
        let target = ReplyTarget {
            channel: ChannelIdentity::new(-100, None),
            reply_to: None,
        };
        let params = send_message_params(&target, "ok");
        assert!(params.get("message_thread_id").is_none());
        assert!(params.get("reply_parameters").is_none());
    }

    #[test]
    fn test_api_error_uses_description() {
        let response: ApiResponse<bool> =
            serde_json::from_str(r#"{"ok": false, "description": "Unauthorized"}"#).unwrap();
        match into_result(response) {
            Err(TelegramError::Api(msg)) => assert_eq!(msg, "Unauthorized"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_ok_response_yields_result() {
        let response: ApiResponse<Vec<Update>> =
            serde_json::from_str(r#"{"ok": true, "result": []}"#).unwrap();
        assert!(into_result(response).unwrap().is_empty());
    }
}
