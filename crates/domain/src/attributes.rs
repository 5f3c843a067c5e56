//! Attribute gauges and the store that bounds them.
//!
//! Every gauge is an integer in `[MIN_VALUE, MAX_VALUE]`. The store clamps
//! after every mutation, so no input can push a value out of range. How much
//! a single interaction is *allowed* to move a gauge is interpreter policy
//! and lives in the engine crate, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lower bound for every gauge.
pub const MIN_VALUE: i64 = 0;

/// Upper bound for every gauge.
pub const MAX_VALUE: i64 = 100;

/// The recognized gauges, in display order.
///
/// Attribute-by-name access goes through [`Attribute::from_name`]; there is
/// no reflective field lookup anywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Food,
    Water,
    Energy,
    Happiness,
}

/// All attributes in fixed display order.
pub const ATTRIBUTES: [Attribute; 4] = [
    Attribute::Food,
    Attribute::Water,
    Attribute::Energy,
    Attribute::Happiness,
];

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Water => "water",
            Self::Energy => "energy",
            Self::Happiness => "happiness",
        }
    }

    /// Resolve a wire-level attribute name. Names are lowercase and exact;
    /// anything else is unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "food" => Some(Self::Food),
            "water" => Some(Self::Water),
            "energy" => Some(Self::Energy),
            "happiness" => Some(Self::Happiness),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value copy of every gauge, ordered food, water, energy, happiness.
pub type StatusSnapshot = BTreeMap<Attribute, i64>;

/// The attribute store: one bounded slot per recognized gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    values: [i64; ATTRIBUTES.len()],
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSet {
    /// A fresh set with every gauge at full.
    pub fn new() -> Self {
        Self {
            values: [MAX_VALUE; ATTRIBUTES.len()],
        }
    }

    pub fn get(&self, attribute: Attribute) -> i64 {
        self.values[attribute as usize]
    }

    /// Value copy of all gauges. No side effects.
    pub fn snapshot(&self) -> StatusSnapshot {
        ATTRIBUTES
            .iter()
            .map(|attr| (*attr, self.values[*attr as usize]))
            .collect()
    }

    /// Apply a signed delta to the gauge named `name`.
    ///
    /// Unrecognized names fail with [`DomainError::UnknownAttribute`] and
    /// mutate nothing. Otherwise the new value is clamped into
    /// `[MIN_VALUE, MAX_VALUE]` and the full post-update snapshot is
    /// returned. Any signed delta is accepted here; only the resulting value
    /// is bounded.
    pub fn update(&mut self, name: &str, delta: i64) -> Result<StatusSnapshot, DomainError> {
        let attribute =
            Attribute::from_name(name).ok_or_else(|| DomainError::unknown_attribute(name))?;
        Ok(self.apply(attribute, delta))
    }

    /// Typed variant of [`AttributeSet::update`] for callers that already
    /// hold a validated [`Attribute`].
    pub fn apply(&mut self, attribute: Attribute, delta: i64) -> StatusSnapshot {
        let slot = &mut self.values[attribute as usize];
        *slot = slot.saturating_add(delta).clamp(MIN_VALUE, MAX_VALUE);
        self.snapshot()
    }
}

/// Per-attribute difference between two snapshots.
///
/// Attributes whose value is unchanged are omitted, not zero-filled.
pub fn status_diff(before: &StatusSnapshot, after: &StatusSnapshot) -> BTreeMap<Attribute, i64> {
    after
        .iter()
        .filter_map(|(attribute, value)| {
            let prior = before.get(attribute).copied().unwrap_or(*value);
            (prior != *value).then_some((*attribute, *value - prior))
        })
        .collect()
}
