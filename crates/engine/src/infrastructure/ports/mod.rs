//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

pub use error::LlmError;
pub use external::{ChatMessage, LlmPort, LlmRequest, LlmResponse, MessageRole, TokenUsage};
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;
