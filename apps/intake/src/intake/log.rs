//! Advisory running record of processed orders.
//!
//! Append-only and in-memory. Nothing in the decision path reads it back, so
//! losing it (restart, poisoned lock) never changes how an order is judged.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intake::fields::ExtractedFields;
use crate::intake::validation::ValidationOutcome;
use crate::models::channel::ChannelIdentity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub channel: ChannelIdentity,
    /// `None` when extraction failed before any fields were parsed.
    pub fields: Option<ExtractedFields>,
    pub outcome: ValidationOutcome,
}

impl OrderLogEntry {
    pub fn new(
        channel: ChannelIdentity,
        fields: Option<ExtractedFields>,
        outcome: ValidationOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            channel,
            fields,
            outcome,
        }
    }
}

/// Cheap to clone; all clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<OrderLogEntry>>>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: OrderLogEntry) {
        self.lock().push(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<OrderLogEntry> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<OrderLogEntry> {
        self.lock().iter().find(|e| e.id == id).cloned()
    }

    // A panic while holding the lock leaves the Vec intact, so keep using it.
    fn lock(&self) -> MutexGuard<'_, Vec<OrderLogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
