mod config;
mod errors;
mod intake;
mod llm_client;
mod models;
mod routes;
mod state;
mod telegram;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, TelegramMode};
use crate::intake::log::OrderLog;
use crate::intake::pipeline::IntakePipeline;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::telegram::polling::run_polling;
use crate::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order intake bot v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_api_url.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize Telegram client
    let telegram = TelegramClient::new(&config.telegram_bot_token)?;

    if config.allowed_contexts.is_empty() {
        warn!("ALLOWED_CONTEXTS is empty; every message will be ignored");
    } else {
        info!(
            "Serving {} allowed chat/thread contexts",
            config.allowed_contexts.len()
        );
    }
    if config.orders_api_token.is_none() {
        info!("ORDERS_API_TOKEN not set; order log API is closed");
    }

    let order_log = OrderLog::new();
    let pipeline = Arc::new(IntakePipeline::new(
        config.allowed_contexts.clone(),
        Arc::new(llm),
        order_log.clone(),
    ));
    let replies: Arc<dyn telegram::ReplySink> = Arc::new(telegram.clone());

    // The webhook route only accepts calls while a webhook is registered.
    let webhook_secret = match (config.telegram_mode, &config.webhook_url) {
        (TelegramMode::Webhook, Some(url)) => {
            telegram
                .set_webhook(url, config.webhook_secret.as_deref())
                .await?;
            info!("Telegram webhook registered at {url}");
            config.webhook_secret.clone()
        }
        _ => {
            tokio::spawn(run_polling(telegram, pipeline.clone(), replies.clone()));
            None
        }
    };

    // Build app state
    let state = AppState {
        pipeline,
        replies,
        order_log,
        webhook_secret,
        orders_api_token: config.orders_api_token.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
