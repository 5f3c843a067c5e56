//! Pocketpet Domain - the pet state engine.
//!
//! Pure state, no I/O:
//!
//! - `attributes` - Named integer gauges with bound enforcement
//! - `pet` - The pet aggregate and its append-only interaction ledger
//! - `error` - Domain error type
//!
//! The engine crate drives all mutations through these types.

pub mod attributes;
pub mod error;
pub mod pet;

pub use attributes::{
    status_diff, Attribute, AttributeSet, StatusSnapshot, ATTRIBUTES, MAX_VALUE, MIN_VALUE,
};
pub use error::DomainError;
pub use pet::{AttributeChange, InteractionRecord, Pet};
