use serde::{Deserialize, Serialize};

/// A single observable symptom, keyed by its stable code.
///
/// The label doubles as the question text shown when the symptom is asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub code: String,
    pub label: String,
}
