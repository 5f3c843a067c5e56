//! Error types for port operations.

/// Errors from the external text-generation service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// The call itself failed: network, auth, rate limit, or timeout.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    /// The service answered, but not with a usable completion payload.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
