pub mod loader;
pub mod sqlite;

pub use loader::*;
pub use sqlite::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Disease, RuleRow, Symptom};

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// The read-only aggregate of symptoms and diseases with their rule lists.
///
/// Loaded once per session and never mutated afterwards; both inference
/// strategies borrow it for the lifetime of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub symptoms: Vec<Symptom>,
    pub diseases: Vec<Disease>,
}

impl KnowledgeBase {
    /// Question text for a symptom code, falling back to the raw code when
    /// the symptom table carries no label for it.
    pub fn question_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.symptoms
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.label.as_str())
            .unwrap_or(code)
    }

    /// Flatten the grouped rule lists into one row per (disease, symptom)
    /// association. Row order is disease order × rule order, so scorer
    /// iteration is deterministic. Duplicate entries stay duplicated.
    pub fn rule_rows(&self) -> Vec<RuleRow> {
        self.diseases
            .iter()
            .flat_map(|d| {
                d.rules.iter().map(move |code| RuleRow {
                    disease_code: d.code.clone(),
                    disease_name: d.name.clone(),
                    solution: d.solution.clone(),
                    severity: d.severity.clone(),
                    symptom_code: code.clone(),
                })
            })
            .collect()
    }

    /// Rule codes that reference no known symptom. Diagnostic only: such
    /// codes still work, they just surface as raw text when asked.
    pub fn dangling_symptom_codes(&self) -> Vec<&str> {
        let known: HashSet<&str> = self.symptoms.iter().map(|s| s.code.as_str()).collect();
        let mut seen = HashSet::new();
        let mut dangling = Vec::new();
        for disease in &self.diseases {
            for code in &disease.rules {
                if !known.contains(code.as_str()) && seen.insert(code.as_str()) {
                    dangling.push(code.as_str());
                }
            }
        }
        dangling
    }

    /// Log a post-load summary plus any referential gaps.
    pub fn log_integrity(&self) {
        tracing::info!(
            symptoms = self.symptoms.len(),
            diseases = self.diseases.len(),
            "Knowledge base loaded"
        );
        for code in self.dangling_symptom_codes() {
            tracing::warn!(code, "Rule references a symptom with no label");
        }
    }
}
