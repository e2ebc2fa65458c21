//! Inference strategy selection.
//!
//! Two strategies cover the same knowledge base: sequential elimination
//! (backward chaining, the canonical interactive flow) and confidence
//! ranking (forward chaining over a full symptom selection). [`diagnose`]
//! drives either one from a single answer source.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::kb::KnowledgeBase;

use super::scorer;
use super::session::Session;
use super::types::{DiagnosisOutcome, EngineError, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceStrategy {
    /// Backward chaining: goals tried in order, questions asked on demand.
    SequentialElimination,
    /// Forward chaining: every symptom asked once, diseases ranked by match
    /// ratio.
    ConfidenceRanking,
}

impl Default for InferenceStrategy {
    fn default() -> Self {
        Self::SequentialElimination
    }
}

impl fmt::Display for InferenceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InferenceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SequentialElimination => "sequential_elimination",
            Self::ConfidenceRanking => "confidence_ranking",
        }
    }

    /// Strategy from the `CAPSICA_STRATEGY` environment variable, falling
    /// back to the default when unset or unrecognized.
    pub fn from_env() -> Self {
        match std::env::var(config::STRATEGY_ENV) {
            Ok(value) => match value.as_str() {
                "sequential_elimination" => Self::SequentialElimination,
                "confidence_ranking" => Self::ConfidenceRanking,
                other => {
                    tracing::warn!(value = other, "Unrecognized strategy, using default");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// Supplies yes/no answers for surfaced questions.
///
/// Implemented for any `FnMut(&Question) -> bool`, which covers tests and
/// simple frontends; interactive presentation layers implement it over
/// their own input loop.
pub trait AnswerSource {
    fn answer(&mut self, question: &Question) -> bool;
}

impl<F: FnMut(&Question) -> bool> AnswerSource for F {
    fn answer(&mut self, question: &Question) -> bool {
        self(question)
    }
}

/// Run one full diagnosis with the given strategy, pulling answers from
/// `source` until a result is reached.
///
/// Sequential elimination asks only the questions the state machine
/// surfaces and needs a non-empty disease list. Confidence ranking asks
/// every symptom once in knowledge-base order and never fails: an empty
/// knowledge base yields the unidentified result.
pub fn diagnose(
    kb: &KnowledgeBase,
    strategy: InferenceStrategy,
    source: &mut dyn AnswerSource,
) -> Result<DiagnosisOutcome, EngineError> {
    tracing::info!(%strategy, "Running diagnosis");

    match strategy {
        InferenceStrategy::SequentialElimination => {
            let mut session = Session::new(kb)?;
            session.start();
            while let Some(question) = session.current_question() {
                let value = source.answer(&question);
                session.answer(value)?;
            }
            let outcome = session.outcome().ok_or(EngineError::NotAwaitingAnswer {
                state: session.state().name(),
            })?;
            Ok(DiagnosisOutcome::Eliminated(outcome))
        }
        InferenceStrategy::ConfidenceRanking => {
            let mut selected: HashSet<String> = HashSet::new();
            for symptom in &kb.symptoms {
                let question = Question {
                    code: symptom.code.clone(),
                    text: symptom.label.clone(),
                };
                if source.answer(&question) {
                    selected.insert(symptom.code.clone());
                }
            }
            Ok(DiagnosisOutcome::Ranked(scorer::score(
                &kb.rule_rows(),
                &selected,
            )))
        }
    }
}
