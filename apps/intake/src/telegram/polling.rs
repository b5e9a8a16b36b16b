use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::intake::pipeline::IntakePipeline;
use crate::telegram::dispatch::dispatch_update;
use crate::telegram::{ReplySink, TelegramClient, Update, POLL_TIMEOUT_SECS};

const ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Long-polls `getUpdates` forever, handling every update on its own task.
///
/// A webhook left over from webhook mode blocks `getUpdates`, so it is removed first.
pub async fn run_polling(
    client: TelegramClient,
    pipeline: Arc<IntakePipeline>,
    sink: Arc<dyn ReplySink>,
) {
    if let Err(e) = client.delete_webhook().await {
        warn!("Could not remove webhook before polling: {e}");
    }
    info!("Polling Telegram for updates");

    let mut offset = 0;
    loop {
        let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                error!("getUpdates failed: {e}; pausing {}s", ERROR_PAUSE.as_secs());
                tokio::time::sleep(ERROR_PAUSE).await;
                continue;
            }
        };

        offset = next_offset(offset, &updates);

        for update in updates {
            let pipeline = pipeline.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                dispatch_update(&pipeline, sink.as_ref(), update).await;
            });
        }
    }
}

/// Offset that acknowledges every update in `updates`.
fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(update_id: i64) -> Update {
        Update {
            update_id,
            message: None,
        }
    }

    #[test]
    fn test_offset_unchanged_without_updates() {
        assert_eq!(next_offset(42, &[]), 42);
    }

    #[test]
    fn test_offset_moves_past_highest_update() {
        assert_eq!(next_offset(0, &[update(10), update(12), update(11)]), 13);
    }

    #[test]
    fn test_offset_never_goes_backwards() {
        assert_eq!(next_offset(100, &[update(5)]), 100);
    }
}
