use crate::models::channel::ChannelIdentity;

/// A single inbound order message. Lives only for the duration of one `handle` call.
#[derive(Debug, Clone)]
pub struct RawOrder {
    pub text: String,
    pub channel: ChannelIdentity,
    /// Telegram message id, used to reply in-thread to the original message.
    pub message_id: Option<i64>,
}

impl RawOrder {
    pub fn new(text: impl Into<String>, channel: ChannelIdentity) -> Self {
        Self {
            text: text.into(),
            channel,
            message_id: None,
        }
    }

    pub fn in_reply_to(mut self, message_id: i64) -> Self {
        self.message_id = Some(message_id);
        self
    }
}
