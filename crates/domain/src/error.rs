//! Unified error type for the domain layer.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Attribute name is not in the recognized set
    #[error("Unknown attribute: {name}")]
    UnknownAttribute { name: String },
}

impl DomainError {
    /// Create an UnknownAttribute error carrying the offending name.
    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }
}
