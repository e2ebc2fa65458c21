use serde::Serialize;
use thiserror::Error;

use crate::models::enums::Severity;

/// Name reported when no disease pattern matches the selection.
pub const UNIDENTIFIED_NAME: &str = "Unidentified disease";

/// Generic remediation text attached to the unidentified result.
pub const UNIDENTIFIED_SOLUTION: &str =
    "The symptoms you entered do not match any disease pattern in the knowledge base. \
     This may be a physiological disorder or a disease that has not been catalogued yet.";

#[derive(Error, Debug)]
pub enum EngineError {
    /// The knowledge base holds no diseases; inference cannot start.
    #[error("knowledge base contains no diseases")]
    EmptyKnowledgeBase,

    /// `answer()` called while no question was pending: a usage-contract
    /// violation by the caller, not a data condition.
    #[error("no question is pending (session is {state})")]
    NotAwaitingAnswer { state: &'static str },
}

/// Forward-chaining result: the best-ranked disease, or the unidentified
/// placeholder when nothing scored above zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub name: String,
    pub solution: String,
    pub severity: Severity,
    /// Percentage of the disease's rule rows matched by the selection, 0-100.
    pub confidence: u8,
}

impl Diagnosis {
    /// The synthetic result returned when nothing matches.
    pub fn unidentified() -> Self {
        Self {
            name: UNIDENTIFIED_NAME.into(),
            solution: UNIDENTIFIED_SOLUTION.into(),
            severity: Severity::Low,
            confidence: 0,
        }
    }
}

/// A question surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub code: String,
    pub text: String,
}

/// A symptom the user confirmed during a run that ended without a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedSymptom {
    pub code: String,
    pub label: String,
}

/// Residual information attached to a failed backward run: the user gets
/// their confirmed symptoms back, not a blank failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    pub message: String,
    /// Symptoms answered "yes", in ask order. Empty when every answer was no.
    pub confirmed: Vec<ConfirmedSymptom>,
}

/// Terminal outcome of a backward-chaining session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionOutcome {
    Succeeded { diagnosis: String, solution: String },
    Failed(FailureReport),
}

impl SessionOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Result of [`super::diagnose`], tagged by the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosisOutcome {
    /// Confidence-ranked best match (forward chaining).
    Ranked(Diagnosis),
    /// Sequential elimination verdict (backward chaining).
    Eliminated(SessionOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unidentified_is_low_severity_zero_confidence() {
        let d = Diagnosis::unidentified();
        assert_eq!(d.name, UNIDENTIFIED_NAME);
        assert_eq!(d.severity, Severity::Low);
        assert_eq!(d.confidence, 0);
    }

    #[test]
    fn outcome_success_flag() {
        let ok = SessionOutcome::Succeeded {
            diagnosis: "Anthracnose".into(),
            solution: "spray".into(),
        };
        let failed = SessionOutcome::Failed(FailureReport {
            message: "no match".into(),
            confirmed: vec![],
        });
        assert!(ok.success());
        assert!(!failed.success());
    }

    #[test]
    fn diagnosis_serializes() {
        let json = serde_json::to_string(&Diagnosis::unidentified()).unwrap();
        assert!(json.contains("\"confidence\":0"));
        assert!(json.contains("\"severity\":\"low\""));
    }
}
