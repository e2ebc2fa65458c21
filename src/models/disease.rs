use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// A diagnosable disease, the "goal" in backward chaining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub code: String,
    pub name: String,
    /// Remediation suggestion shown alongside the diagnosis.
    pub solution: String,
    pub severity: Severity,
    /// Required symptom codes, in evaluation order. Duplicates are preserved.
    pub rules: Vec<String>,
}
