//! Strict decoder for the model's structured pet reply.
//!
//! The model is instructed to answer with a bare JSON object:
//! `{"messages": [...], "changes": [{"attribute": ..., "value": ...}]}`.
//! Local models routinely wrap that object in markdown fences or leak
//! chat-template special tokens, so decoding is cleanup first, then a strict
//! `serde_json` parse. The raw text is never evaluated - an unparseable
//! reply is an error, not something to improvise around.

use std::sync::LazyLock;

use pocketpet_domain::AttributeChange;
use regex_lite::Regex;
use serde::Deserialize;

/// Upper bound on reply messages per interaction.
pub const MAX_REPLY_MESSAGES: usize = 3;

/// A structured reply decoded from the model output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PetReply {
    /// What the pet says, in order. One to three entries.
    pub messages: Vec<String>,
    /// Requested gauge changes, possibly empty.
    #[serde(default)]
    pub changes: Vec<AttributeChange>,
}

/// Why a reply could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum MalformedReply {
    #[error("not a valid reply object: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("\"messages\" must contain 1 to {MAX_REPLY_MESSAGES} entries, got {0}")]
    MessageCount(usize),
}

// Model-specific special tokens that leak through from chat templates:
// <|...|> style tokens, llama [INST]/<<SYS>> markers
static SPECIAL_TOKENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|[^|>]+\|>|\[/?INST\]|<</?SYS>>").expect("valid regex"));

// gpt-oss style responses put the real answer after a final-channel marker:
// <|channel|>analysis<|message|>...<|end|>...<|channel|>final<|message|>CONTENT
static FINAL_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\|channel\|>final<\|message\|>(.*)$").expect("valid regex"));

/// Remove model-specific special tokens that may leak through from LLM
/// output, keeping only the final-channel content where present.
fn strip_special_tokens(raw: &str) -> String {
    if let Some(caps) = FINAL_CONTENT_RE.captures(raw) {
        if let Some(content) = caps.get(1) {
            return SPECIAL_TOKENS_RE
                .replace_all(content.as_str().trim(), "")
                .to_string();
        }
    }

    SPECIAL_TOKENS_RE.replace_all(raw, "").to_string()
}

/// Slice out the outermost JSON object, tolerating markdown fences and
/// stray prose around it.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Decode one model reply into a [`PetReply`].
///
/// Fails on anything that is not a JSON object with the required fields, a
/// non-numeric change value, or a `messages` array outside 1..=3 entries.
/// Unrecognized attribute *names* are NOT rejected here - they are kept
/// verbatim for the audit ledger and skipped at apply time.
pub fn parse_pet_reply(raw: &str) -> Result<PetReply, MalformedReply> {
    let cleaned = strip_special_tokens(raw);
    let payload = extract_json_object(&cleaned).unwrap_or_else(|| cleaned.trim());

    let reply: PetReply = serde_json::from_str(payload)?;

    if reply.messages.is_empty() || reply.messages.len() > MAX_REPLY_MESSAGES {
        return Err(MalformedReply::MessageCount(reply.messages.len()));
    }

    Ok(reply)
}
