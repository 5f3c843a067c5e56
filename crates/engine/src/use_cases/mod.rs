//! Use cases - interaction orchestration.

pub mod interact;
pub mod response_parser;

pub use interact::{InteractError, InteractUseCase, InteractionOutcome};
