//! Interact use case - one natural-language exchange with the pet.
//!
//! Pipeline: build the generation request, await the model, strictly decode
//! the reply, then apply changes / diff / commit as a single critical
//! section on the pet. The model call is resolved before the pet lock is
//! taken, so a slow or failed generation never blocks readers of status or
//! history.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use pocketpet_domain::{
    status_diff, Attribute, AttributeChange, DomainError, InteractionRecord, Pet, StatusSnapshot,
};

use crate::infrastructure::ports::{ChatMessage, ClockPort, LlmError, LlmPort, LlmRequest};
use crate::prompt_templates;
use crate::use_cases::response_parser::{self, MalformedReply};

/// Sampling temperature for pet replies. Fixed by policy.
const REPLY_TEMPERATURE: f32 = 0.7;

/// Smallest delta one interaction may request for a gauge.
pub const DELTA_MIN: i64 = -20;

/// Largest delta one interaction may request for a gauge.
pub const DELTA_MAX: i64 = 20;

/// Errors surfaced to the caller. None of these leave partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum InteractError {
    /// The external generation call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
    /// The model answered with something the strict decoder rejected.
    #[error("malformed model reply: {0}")]
    MalformedResponse(String),
    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MalformedReply> for InteractError {
    fn from(e: MalformedReply) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

/// Result of one committed interaction.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InteractionOutcome {
    /// The pet's reply messages, in order.
    pub messages: Vec<String>,
    /// Full post-interaction snapshot.
    pub status: StatusSnapshot,
    /// Net post-clamp change, unchanged attributes omitted.
    pub status_change: BTreeMap<Attribute, i64>,
    /// Raw requested changes, pre-clamp, for audit.
    pub changes: Vec<AttributeChange>,
}

/// Turns a natural-language prompt into validated gauge mutations plus a
/// reply, and commits the result to the pet's ledger.
pub struct InteractUseCase {
    pet: Arc<Mutex<Pet>>,
    llm: Arc<dyn LlmPort>,
    clock: Arc<dyn ClockPort>,
}

impl InteractUseCase {
    pub fn new(pet: Arc<Mutex<Pet>>, llm: Arc<dyn LlmPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { pet, llm, clock }
    }

    pub async fn execute(&self, prompt: String) -> Result<InteractionOutcome, InteractError> {
        let request = LlmRequest::new(vec![ChatMessage::user(prompt.clone())])
            .with_system_prompt(prompt_templates::pet_system_prompt())
            .with_temperature(REPLY_TEMPERATURE);

        let response = self.llm.generate(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "pet reply generated"
            );
        }

        let reply = response_parser::parse_pet_reply(&response.content)?;

        // Critical section: snapshot -> apply -> diff -> commit. Nothing
        // before this point has touched the pet.
        let mut pet = self.pet.lock().await;
        let before = pet.status();

        for change in &reply.changes {
            if !(DELTA_MIN..=DELTA_MAX).contains(&change.value) {
                // Policy: accept and let the store clamp the resulting value
                tracing::warn!(
                    attribute = %change.attribute,
                    value = change.value,
                    "requested delta outside permitted range"
                );
            }

            // Each change sees the cumulative effect of the ones before it
            match pet.update_attribute(&change.attribute, change.value) {
                Ok(_) => {}
                Err(DomainError::UnknownAttribute { name }) => {
                    tracing::warn!(attribute = %name, "skipping change for unrecognized attribute");
                }
            }
        }

        let status = pet.status();
        let status_change = status_diff(&before, &status);

        pet.record_interaction(InteractionRecord {
            timestamp: self.clock.now(),
            prompt,
            messages: reply.messages.clone(),
            status_change: status_change.clone(),
            changes: reply.changes.clone(),
        });

        Ok(InteractionOutcome {
            messages: reply.messages,
            status,
            status_change,
            changes: reply.changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmResponse, MockClockPort};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    /// LLM stub that always answers with the same text.
    struct StaticLlm(String);

    #[async_trait]
    impl LlmPort for StaticLlm {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
            Ok(LlmResponse {
                content: self.0.clone(),
                usage: None,
            })
        }
    }

    /// LLM stub that always fails the call itself.
    struct FailingLlm;

    #[async_trait]
    impl LlmPort for FailingLlm {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
            Err(LlmError::RequestFailed("connection refused".to_string()))
        }
    }

    fn fixed_clock() -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        Arc::new(clock)
    }

    fn use_case_with_reply(reply: &str) -> (InteractUseCase, Arc<Mutex<Pet>>) {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let pet = Arc::new(Mutex::new(Pet::new("Biscuit", created)));
        let use_case = InteractUseCase::new(
            pet.clone(),
            Arc::new(StaticLlm(reply.to_string())),
            fixed_clock(),
        );
        (use_case, pet)
    }

    #[tokio::test]
    async fn applies_changes_and_commits_one_record() {
        let reply = r#"{"messages": ["*munches* Thank you!"], "changes": [{"attribute": "food", "value": -20}, {"attribute": "water", "value": -10}]}"#;
        let (use_case, pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("go for a run".to_string()).await.unwrap();

        assert_eq!(outcome.status[&Attribute::Food], 80);
        assert_eq!(outcome.status[&Attribute::Water], 90);
        assert_eq!(outcome.status[&Attribute::Energy], 100);
        assert_eq!(outcome.status[&Attribute::Happiness], 100);
        assert_eq!(outcome.status_change[&Attribute::Food], -20);
        assert_eq!(outcome.status_change[&Attribute::Water], -10);
        assert_eq!(outcome.status_change.len(), 2);

        let pet = pet.lock().await;
        assert_eq!(pet.history().len(), 1);
        let record = &pet.history()[0];
        assert_eq!(record.prompt, "go for a run");
        assert_eq!(record.changes.len(), 2);
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(pet.last_interaction(), record.timestamp);
    }

    #[tokio::test]
    async fn empty_changes_commits_with_empty_diff() {
        let reply = r#"{"messages": ["Just chatting."], "changes": []}"#;
        let (use_case, pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("let's chat".to_string()).await.unwrap();

        assert!(outcome.status_change.is_empty());
        assert!(outcome.status.values().all(|v| *v == 100));
        assert_eq!(pet.lock().await.history().len(), 1);
    }

    #[tokio::test]
    async fn malformed_reply_mutates_nothing() {
        let (use_case, pet) = use_case_with_reply("the pet is happy (trust me)");

        let err = use_case.execute("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, InteractError::MalformedResponse(_)));

        let pet = pet.lock().await;
        assert!(pet.history().is_empty());
        assert!(pet.status().values().all(|v| *v == 100));
    }

    #[tokio::test]
    async fn generation_failure_mutates_nothing() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let pet = Arc::new(Mutex::new(Pet::new("Biscuit", created)));
        let use_case = InteractUseCase::new(pet.clone(), Arc::new(FailingLlm), fixed_clock());

        let err = use_case.execute("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, InteractError::Generation(_)));

        let pet = pet.lock().await;
        assert!(pet.history().is_empty());
        assert_eq!(pet.last_interaction(), created);
    }

    #[tokio::test]
    async fn unrecognized_attribute_is_skipped_not_fatal() {
        let reply = r#"{"messages": ["Ouch."], "changes": [{"attribute": "health", "value": -10}, {"attribute": "happiness", "value": -5}]}"#;
        let (use_case, pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("rough day".to_string()).await.unwrap();

        // The unknown change is absent from the diff but kept in the audit list
        assert_eq!(outcome.status_change.len(), 1);
        assert_eq!(outcome.status_change[&Attribute::Happiness], -5);
        assert_eq!(outcome.changes.len(), 2);
        assert_eq!(outcome.changes[0].attribute, "health");

        let pet = pet.lock().await;
        assert_eq!(pet.history().len(), 1);
        assert_eq!(pet.history()[0].changes[0].attribute, "health");
    }

    #[tokio::test]
    async fn out_of_range_delta_is_clamped_not_rejected() {
        let reply = r#"{"messages": ["So sleepy..."], "changes": [{"attribute": "energy", "value": -250}]}"#;
        let (use_case, _pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("marathon".to_string()).await.unwrap();

        assert_eq!(outcome.status[&Attribute::Energy], 0);
        assert_eq!(outcome.status_change[&Attribute::Energy], -100);
        // The raw request is preserved unclamped
        assert_eq!(outcome.changes[0].value, -250);
    }

    #[tokio::test]
    async fn same_attribute_changes_apply_sequentially() {
        // Food starts at 100; -90 lands at 10, -20 clamps at 0, +5 ends at 5.
        // Summing first (-105) would have clamped to 0.
        let reply = r#"{"messages": ["What a ride."], "changes": [{"attribute": "food", "value": -90}, {"attribute": "food", "value": -20}, {"attribute": "food", "value": 5}]}"#;
        let (use_case, _pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("busy day".to_string()).await.unwrap();

        assert_eq!(outcome.status[&Attribute::Food], 5);
        assert_eq!(outcome.status_change[&Attribute::Food], -95);
    }

    #[tokio::test]
    async fn history_grows_by_one_per_successful_interaction() {
        let reply = r#"{"messages": ["Again!"], "changes": []}"#;
        let (use_case, pet) = use_case_with_reply(reply);

        for i in 0..4 {
            use_case.execute(format!("round {i}")).await.unwrap();
        }

        let pet = pet.lock().await;
        assert_eq!(pet.history().len(), 4);
        let prompts: Vec<_> = pet.history().iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["round 0", "round 1", "round 2", "round 3"]);
    }

    #[tokio::test]
    async fn diff_omits_attributes_that_net_to_zero() {
        // -10 then +10 on the same gauge nets out; the diff must omit it
        let reply = r#"{"messages": ["Hm."], "changes": [{"attribute": "water", "value": -10}, {"attribute": "water", "value": 10}]}"#;
        let (use_case, _pet) = use_case_with_reply(reply);

        let outcome = use_case.execute("splash".to_string()).await.unwrap();

        assert!(outcome.status_change.is_empty());
    }
}
