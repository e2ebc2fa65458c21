//! Forward-chaining confidence scorer.
//!
//! Aggregates every (disease, symptom) rule row into a per-disease match
//! ratio and returns the best-ranked disease. Counting is literal row
//! counting: a symptom listed twice for a disease contributes two rows to
//! both the total and, when selected, the match count.

use std::collections::{HashMap, HashSet};

use crate::models::enums::Severity;
use crate::models::RuleRow;

use super::types::Diagnosis;

/// Per-disease accumulator, assembled field by field. Carries exactly the
/// display metadata the result needs.
#[derive(Debug)]
struct DiseaseScore {
    name: String,
    solution: String,
    severity: Severity,
    matched: u32,
    total_rows: u32,
}

/// Rank every disease by the share of its rule rows matched by `selected`
/// and return the winner.
///
/// Pure function: no I/O, no side effects. Ties keep the first disease in
/// row-iteration order. An empty rule set, an empty selection, or a
/// selection matching nothing yields [`Diagnosis::unidentified`].
pub fn score(rules: &[RuleRow], selected: &HashSet<String>) -> Diagnosis {
    let mut scores: Vec<DiseaseScore> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rules {
        let i = match index.get(row.disease_code.as_str()) {
            Some(&i) => i,
            None => {
                scores.push(DiseaseScore {
                    name: row.disease_name.clone(),
                    solution: row.solution.clone(),
                    severity: row.severity.clone(),
                    matched: 0,
                    total_rows: 0,
                });
                index.insert(&row.disease_code, scores.len() - 1);
                scores.len() - 1
            }
        };

        scores[i].total_rows += 1;
        if selected.contains(&row.symptom_code) {
            scores[i].matched += 1;
        }
    }

    let mut best: Option<(&DiseaseScore, f64)> = None;
    for entry in &scores {
        if entry.total_rows == 0 {
            continue;
        }
        let confidence = f64::from(entry.matched) / f64::from(entry.total_rows) * 100.0;
        let highest = best.map(|(_, c)| c).unwrap_or(0.0);
        if confidence > highest && confidence > 0.0 {
            best = Some((entry, confidence));
        }
    }

    match best {
        Some((winner, confidence)) => Diagnosis {
            name: winner.name.clone(),
            solution: winner.solution.clone(),
            severity: winner.severity.clone(),
            confidence: confidence.round() as u8,
        },
        None => Diagnosis::unidentified(),
    }
}
