use tracing::{debug, warn};

use crate::intake::pipeline::IntakePipeline;
use crate::models::order::RawOrder;
use crate::telegram::{Message, ReplySink, ReplyTarget, Update};

/// Runs one Telegram update through the intake pipeline and delivers the reply.
///
/// Updates without a text message and bot commands are ignored.
pub async fn dispatch_update(pipeline: &IntakePipeline, sink: &dyn ReplySink, update: Update) {
    let Some(order) = update.message.and_then(order_from_message) else {
        debug!("Skipping update {} (no order text)", update.update_id);
        return;
    };

    let Some(reply) = pipeline.handle(&order).await else {
        return;
    };

    let target = ReplyTarget {
        channel: order.channel,
        reply_to: order.message_id,
    };
    if let Err(e) = sink.deliver(&target, &reply.text).await {
        warn!("Failed to deliver reply to {}: {e}", order.channel);
    }
}

fn order_from_message(message: Message) -> Option<RawOrder> {
    let channel = message.channel();
    let text = message.text?;
    if text.trim().is_empty() || text.starts_with('/') {
        return None;
    }
    Some(RawOrder::new(text, channel).in_reply_to(message.message_id))
}
