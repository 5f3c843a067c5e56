//! Pet aggregate and the interaction ledger.
//!
//! The pet owns exactly one [`AttributeSet`] for its whole lifetime. Gauges
//! are mutated only through [`Pet::update_attribute`]; the ledger is
//! append-only and never reordered or pruned.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::{Attribute, AttributeSet, StatusSnapshot};
use crate::error::DomainError;

/// A raw requested change as supplied by the interpretation step, prior to
/// clamping.
///
/// The attribute name is kept verbatim - even when unrecognized and skipped
/// during apply - so the ledger stays a faithful audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub value: i64,
}

/// One immutable ledger entry per committed interaction.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    /// The caller's prompt, verbatim.
    pub prompt: String,
    /// The pet's reply, one to three messages.
    pub messages: Vec<String>,
    /// Post-clamp net change, attributes with no effective change omitted.
    pub status_change: BTreeMap<Attribute, i64>,
    /// Raw requested changes before clamping, kept for audit.
    pub changes: Vec<AttributeChange>,
}

/// The aggregate root: one pet, one attribute set, one ledger.
#[derive(Debug, Clone)]
pub struct Pet {
    name: String,
    attributes: AttributeSet,
    last_interaction: DateTime<Utc>,
    history: Vec<InteractionRecord>,
}

impl Pet {
    /// Create a pet with every gauge at full.
    ///
    /// `created_at` seeds `last_interaction` so the field is never unset.
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeSet::new(),
            last_interaction: created_at,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value copy of the current gauges.
    pub fn status(&self) -> StatusSnapshot {
        self.attributes.snapshot()
    }

    pub fn last_interaction(&self) -> DateTime<Utc> {
        self.last_interaction
    }

    pub fn history(&self) -> &[InteractionRecord] {
        &self.history
    }

    /// Apply one signed delta through the attribute store.
    ///
    /// This is the only mutation path for gauges. Unrecognized names fail
    /// with [`DomainError::UnknownAttribute`] and change nothing.
    pub fn update_attribute(
        &mut self,
        name: &str,
        delta: i64,
    ) -> Result<StatusSnapshot, DomainError> {
        self.attributes.update(name, delta)
    }

    /// Commit one interaction: append to the ledger and bump
    /// `last_interaction` to the record's timestamp.
    pub fn record_interaction(&mut self, record: InteractionRecord) {
        self.last_interaction = record.timestamp;
        self.history.push(record);
    }
}
