//! The inference core: two alternative strategies over one knowledge base.
//!
//! `scorer` ranks every disease at once from a full symptom selection
//! (forward chaining); `session` eliminates goals one question at a time
//! (backward chaining). `strategy` picks between them and drives either
//! from a single answer source.

pub mod scorer;
pub mod session;
pub mod strategy;
pub mod types;

pub use scorer::score;
pub use session::{Session, SessionState};
pub use strategy::{diagnose, AnswerSource, InferenceStrategy};
pub use types::{
    ConfirmedSymptom, Diagnosis, DiagnosisOutcome, EngineError, FailureReport, Question,
    SessionOutcome,
};
