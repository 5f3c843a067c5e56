//! LLM prompt template for the pet persona.
//!
//! The system prompt is the de facto wire contract between the interpreter
//! and the model: it enumerates the recognized attribute names, the
//! permitted delta range, and the exact JSON output shape. Keep it in
//! lockstep with `use_cases::response_parser`.

use pocketpet_domain::ATTRIBUTES;

use crate::use_cases::interact::{DELTA_MAX, DELTA_MIN};

/// Build the fixed pet-persona system prompt.
///
/// The attribute list is derived from the domain's recognized set so the
/// contract cannot drift from the parser's validation boundary.
pub fn pet_system_prompt() -> String {
    let attribute_names = ATTRIBUTES
        .iter()
        .map(|attr| attr.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a virtual pet with a distinct personality. Based on the user's input, you should:
1. Respond as the pet would (be playful, caring, and maintain character)
2. Decide how this interaction affects the pet's status values

Return ONLY a JSON object in exactly this shape, with no markdown fences and no other text:
{{
    "messages": ["your responses as the pet, showing personality and emotion"],
    "changes": [{{"attribute": "attribute_to_change", "value": change_value}}]
}}

Rules:
- "messages" must contain between 1 and 3 short messages.
- "changes" may be empty if nothing is affected.
- Available attributes: {attribute_names}
- Each "value" is an integer between {DELTA_MIN} and {DELTA_MAX}.

Remember to stay in character and be consistent in your personality!"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_declares_the_wire_contract() {
        let prompt = pet_system_prompt();

        assert!(prompt.contains("food, water, energy, happiness"));
        assert!(prompt.contains("between -20 and 20"));
        assert!(prompt.contains("\"messages\""));
        assert!(prompt.contains("\"changes\""));
        // The dropped v1 attribute must not resurface
        assert!(!prompt.contains("health"));
    }
}
