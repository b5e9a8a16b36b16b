use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};

use crate::errors::AppError;
use crate::routes::auth::require_header_secret;
use crate::state::AppState;
use crate::telegram::dispatch::dispatch_update;
use crate::telegram::Update;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// POST /telegram/webhook
///
/// Acknowledges the update right away; processing happens on a background task.
/// Without a configured secret (polling mode) every call is rejected.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<StatusCode, AppError> {
    require_header_secret(&headers, SECRET_HEADER, state.webhook_secret.as_deref())?;

    tokio::spawn(async move {
        dispatch_update(&state.pipeline, state.replies.as_ref(), update).await;
    });

    Ok(StatusCode::OK)
}
