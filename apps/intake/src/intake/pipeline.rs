//! Intake pipeline: allow-list filter, extraction call, parse, validate, render.
//!
//! The extraction capability is a trait so the pipeline can run against an
//! in-memory fake. `AppState` holds the pipeline as `Arc<IntakePipeline>`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::intake::fields::extract_fields;
use crate::intake::log::{OrderLog, OrderLogEntry};
use crate::intake::prompts::build_extraction_prompt;
use crate::intake::reply::render;
use crate::intake::validation::{validate, ValidationOutcome};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::channel::AllowList;
use crate::models::order::RawOrder;

// ────────────────────────────────────────────────────────────────────────────
// Extraction capability
// ────────────────────────────────────────────────────────────────────────────

/// Turns a prompt into the model's normalized answer.
/// Timeouts and transport failures surface as `Err`.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl Extractor for LlmClient {
    async fn extract(&self, prompt: &str) -> Result<String, LlmError> {
        self.call_text(prompt).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// The outcome of one order together with the text to send back.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReply {
    pub outcome: ValidationOutcome,
    pub text: String,
}

pub struct IntakePipeline {
    allow_list: AllowList,
    extractor: Arc<dyn Extractor>,
    log: OrderLog,
}

impl IntakePipeline {
    pub fn new(allow_list: AllowList, extractor: Arc<dyn Extractor>, log: OrderLog) -> Self {
        Self {
            allow_list,
            extractor,
            log,
        }
    }

    pub fn log(&self) -> &OrderLog {
        &self.log
    }

    /// Processes one order. Returns `None` for messages from channels outside the
    /// allow-list; those never reach the model.
    pub async fn handle(&self, order: &RawOrder) -> Option<RenderedReply> {
        if !self.allow_list.is_allowed(&order.channel) {
            debug!("Ignoring message from {}", order.channel);
            return None;
        }

        let prompt = build_extraction_prompt(&order.text);

        let (fields, outcome) = match self.extractor.extract(&prompt).await {
            Ok(normalized) => {
                let fields = extract_fields(normalized.trim());
                let outcome = validate(&fields);
                (Some(fields), outcome)
            }
            Err(e) => {
                error!("Order extraction failed for {}: {e}", order.channel);
                (
                    None,
                    ValidationOutcome::ExtractionFailed {
                        cause: e.to_string(),
                    },
                )
            }
        };

        info!("Order from {} -> {}", order.channel, outcome.kind());

        self.log
            .append(OrderLogEntry::new(order.channel, fields, outcome.clone()));

        let text = render(&outcome);
        Some(RenderedReply { outcome, text })
    }
}
