use std::sync::Arc;

use crate::intake::log::OrderLog;
use crate::intake::pipeline::IntakePipeline;
use crate::telegram::ReplySink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IntakePipeline>,
    /// Where webhook-driven replies are sent. Polling mode uses the same sink.
    pub replies: Arc<dyn ReplySink>,
    pub order_log: OrderLog,
    /// Expected `X-Telegram-Bot-Api-Secret-Token` on webhook calls.
    /// `None` in polling mode, which disables the webhook route.
    pub webhook_secret: Option<String>,
    /// Bearer token for the order log routes. `None` disables them.
    pub orders_api_token: Option<String>,
}
