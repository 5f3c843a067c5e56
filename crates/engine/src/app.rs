//! Application state and composition.

use std::sync::Arc;

use tokio::sync::Mutex;

use pocketpet_domain::Pet;

use crate::infrastructure::ports::{ClockPort, LlmPort};
use crate::use_cases::InteractUseCase;

/// Main application state.
///
/// Owns the single pet instance (created once at startup, process lifetime)
/// and the use case operating on it. Passed to HTTP handlers via Axum state.
pub struct App {
    pub pet: Arc<Mutex<Pet>>,
    pub interact: InteractUseCase,
}

impl App {
    pub fn new(pet_name: &str, llm: Arc<dyn LlmPort>, clock: Arc<dyn ClockPort>) -> Self {
        let pet = Arc::new(Mutex::new(Pet::new(pet_name, clock.now())));
        let interact = InteractUseCase::new(pet.clone(), llm, clock);
        Self { pet, interact }
    }
}
