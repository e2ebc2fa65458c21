//! Backward-chaining diagnosis session.
//!
//! Goal-directed: diseases are tried in knowledge-base order, each one's
//! required symptoms asked in rule order, and a single "no" disqualifies
//! the goal immediately. Answers are memoized, so a symptom shared between
//! diseases is asked at most once per run.

use std::collections::HashMap;

use uuid::Uuid;

use crate::kb::KnowledgeBase;
use crate::models::Disease;

use super::types::{ConfirmedSymptom, EngineError, FailureReport, Question, SessionOutcome};

/// Failure message when at least one symptom was confirmed.
const NO_MATCH_MESSAGE: &str =
    "No disease in the knowledge base matches your answers exactly. The confirmed symptoms \
     below may point to a combined problem or one that is not catalogued yet.";

/// Failure message when every answer was "no".
const ALL_NEGATIVE_MESSAGE: &str =
    "You answered no to every question. The plant may be healthy, or its symptoms are not \
     registered in the knowledge base yet.";

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    NotStarted,
    /// Suspended on a question; the indices identify the pending (goal, rule).
    AwaitingAnswer { goal: usize, rule: usize },
    Succeeded(Disease),
    Failed(FailureReport),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::AwaitingAnswer { .. } => "awaiting_answer",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// One interactive diagnosis run over a read-only knowledge base.
///
/// The caller owns the session and drives it: `start()`, then `answer()`
/// for each question surfaced through `current_question()`, until the state
/// turns terminal. `start()` again restarts from scratch.
pub struct Session<'kb> {
    id: Uuid,
    kb: &'kb KnowledgeBase,
    /// Memo of every answer given this run, keyed by symptom code.
    facts: HashMap<String, bool>,
    /// Codes in ask order, so failure reports stay deterministic.
    asked: Vec<String>,
    goal: usize,
    rule: usize,
    state: SessionState,
}

impl<'kb> Session<'kb> {
    /// Refuses to build over a knowledge base with no diseases.
    pub fn new(kb: &'kb KnowledgeBase) -> Result<Self, EngineError> {
        if kb.diseases.is_empty() {
            return Err(EngineError::EmptyKnowledgeBase);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kb,
            facts: HashMap::new(),
            asked: Vec::new(),
            goal: 0,
            rule: 0,
            state: SessionState::NotStarted,
        })
    }

    /// Begin (or restart) the run: forget every fact and evaluate from the
    /// first goal.
    pub fn start(&mut self) -> &SessionState {
        self.facts.clear();
        self.asked.clear();
        self.goal = 0;
        self.rule = 0;
        tracing::info!(
            session_id = %self.id,
            goals = self.kb.diseases.len(),
            "Diagnosis session started"
        );
        self.advance();
        &self.state
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Memoized answers so far, keyed by symptom code.
    pub fn facts(&self) -> &HashMap<String, bool> {
        &self.facts
    }

    /// The pending question, if the session is awaiting one.
    pub fn current_question(&self) -> Option<Question> {
        match self.state {
            SessionState::AwaitingAnswer { goal, rule } => {
                let code = &self.kb.diseases[goal].rules[rule];
                Some(Question {
                    code: code.clone(),
                    text: self.kb.question_for(code).to_string(),
                })
            }
            _ => None,
        }
    }

    /// Terminal outcome, once one is reached.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match &self.state {
            SessionState::Succeeded(d) => Some(SessionOutcome::Succeeded {
                diagnosis: d.name.clone(),
                solution: d.solution.clone(),
            }),
            SessionState::Failed(report) => Some(SessionOutcome::Failed(report.clone())),
            _ => None,
        }
    }

    /// Feed the answer to the pending question.
    ///
    /// Valid only in `AwaitingAnswer`; anything else is a usage-contract
    /// violation.
    pub fn answer(&mut self, value: bool) -> Result<&SessionState, EngineError> {
        let SessionState::AwaitingAnswer { goal, rule } = self.state else {
            return Err(EngineError::NotAwaitingAnswer {
                state: self.state.name(),
            });
        };

        let code = self.kb.diseases[goal].rules[rule].clone();
        self.facts.insert(code.clone(), value);
        self.asked.push(code);
        // The memo check in advance() consumes the fresh fact: true moves to
        // the next rule, false to the next goal.
        self.advance();
        Ok(&self.state)
    }

    /// Evaluate goals and rules until a question is pending or the run ends.
    fn advance(&mut self) {
        loop {
            let Some(disease) = self.kb.diseases.get(self.goal) else {
                self.fail();
                return;
            };

            if disease.rules.is_empty() {
                tracing::warn!(
                    session_id = %self.id,
                    disease = %disease.code,
                    "Goal has no rules and cannot be confirmed; skipping"
                );
                self.goal += 1;
                self.rule = 0;
                continue;
            }

            if self.rule >= disease.rules.len() {
                // Every required rule held.
                tracing::info!(
                    session_id = %self.id,
                    disease = %disease.code,
                    asked = self.asked.len(),
                    "Diagnosis established"
                );
                self.state = SessionState::Succeeded(disease.clone());
                return;
            }

            let key = &disease.rules[self.rule];
            match self.facts.get(key) {
                Some(true) => self.rule += 1,
                Some(false) => {
                    self.goal += 1;
                    self.rule = 0;
                }
                None => {
                    self.state = SessionState::AwaitingAnswer {
                        goal: self.goal,
                        rule: self.rule,
                    };
                    return;
                }
            }
        }
    }

    fn fail(&mut self) {
        let confirmed: Vec<ConfirmedSymptom> = self
            .asked
            .iter()
            .filter(|code| self.facts.get(*code).copied().unwrap_or(false))
            .map(|code| ConfirmedSymptom {
                code: code.clone(),
                label: self.kb.question_for(code).to_string(),
            })
            .collect();

        let message = if confirmed.is_empty() {
            ALL_NEGATIVE_MESSAGE
        } else {
            NO_MATCH_MESSAGE
        };

        tracing::info!(
            session_id = %self.id,
            confirmed = confirmed.len(),
            asked = self.asked.len(),
            "No goal matched"
        );
        self.state = SessionState::Failed(FailureReport {
            message: message.to_string(),
            confirmed,
        });
    }
}
