//! Knowledge-base loaders for the two supported input shapes.
//!
//! Flat shape: SQLite tables joined into denormalized rule rows (the
//! database-backed deployment). Grouped shape: a static JSON file of goals
//! plus a question table. Both land in the same [`KnowledgeBase`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rusqlite::Connection;
use serde::Deserialize;

use super::{sqlite, KnowledgeBase, KnowledgeBaseError};
use crate::models::enums::Severity;
use crate::models::{Disease, Symptom};

// ──────────────────────────────────────────────
// Flat shape (SQLite)
// ──────────────────────────────────────────────

/// Load the knowledge base from an open SQLite connection.
///
/// Symptoms are listed in code order; rule rows come from a JOIN ordered by
/// disease code then rule position, then grouped back into per-disease
/// ordered rule lists. A disease with no rule rows never appears.
pub fn load_from_sqlite(conn: &Connection) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let mut stmt = conn.prepare("SELECT code, label FROM symptoms ORDER BY code ASC")?;
    let symptoms = stmt
        .query_map([], |row| {
            Ok(Symptom {
                code: row.get(0)?,
                label: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT d.code, d.name, d.solution, d.severity, r.symptom_code
         FROM disease_rules r
         JOIN diseases d ON r.disease_code = d.code
         ORDER BY d.code ASC, r.position ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut diseases: Vec<Disease> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let (code, name, solution, severity, symptom_code) = row?;
        let i = match index.get(&code) {
            Some(&i) => i,
            None => {
                let severity = Severity::from_str(&severity)?;
                diseases.push(Disease {
                    code: code.clone(),
                    name,
                    solution,
                    severity,
                    rules: Vec::new(),
                });
                index.insert(code, diseases.len() - 1);
                diseases.len() - 1
            }
        };
        diseases[i].rules.push(symptom_code);
    }

    let kb = KnowledgeBase { symptoms, diseases };
    kb.log_integrity();
    Ok(kb)
}

/// Open (and migrate) the database at `path`, then load the knowledge base.
pub fn load_from_sqlite_path(path: &Path) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let conn = sqlite::open_database(path)?;
    load_from_sqlite(&conn)
}

// ──────────────────────────────────────────────
// Grouped shape (JSON)
// ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GroupedKb {
    goals: Vec<GoalRecord>,
    /// BTreeMap keeps symptom order deterministic across loads.
    #[serde(default)]
    questions: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GoalRecord {
    id: String,
    diagnosis: String,
    solution: String,
    #[serde(default)]
    severity: Option<Severity>,
    rules: Vec<String>,
}

/// Parse the grouped JSON shape:
/// `{ goals: [{id, diagnosis, solution, severity?, rules}], questions: {code: text} }`.
///
/// A goal without a severity defaults to low.
pub fn from_json_str(json: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let raw: GroupedKb = serde_json::from_str(json)?;

    let symptoms = raw
        .questions
        .into_iter()
        .map(|(code, label)| Symptom { code, label })
        .collect();

    let diseases = raw
        .goals
        .into_iter()
        .map(|g| Disease {
            code: g.id,
            name: g.diagnosis,
            solution: g.solution,
            severity: g.severity.unwrap_or(Severity::Low),
            rules: g.rules,
        })
        .collect();

    let kb = KnowledgeBase { symptoms, diseases };
    kb.log_integrity();
    Ok(kb)
}

/// Load the grouped JSON shape from a file.
pub fn from_json_file(path: &Path) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let text = fs::read_to_string(path)?;
    from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::kb::sqlite::open_memory_database;

    const CHILI_JSON: &str = include_str!("../../resources/kb/chili.json");

    #[test]
    fn sqlite_seed_loads_complete_kb() {
        let conn = open_memory_database().unwrap();
        let kb = load_from_sqlite(&conn).unwrap();

        assert_eq!(kb.symptoms.len(), 14);
        assert_eq!(kb.diseases.len(), 5);
        assert!(kb.dangling_symptom_codes().is_empty());
    }

    #[test]
    fn sqlite_rules_keep_seed_order() {
        let conn = open_memory_database().unwrap();
        let kb = load_from_sqlite(&conn).unwrap();

        let anthracnose = &kb.diseases[0];
        assert_eq!(anthracnose.code, "P01");
        assert_eq!(anthracnose.rules, vec!["G01", "G02", "G03"]);
        assert_eq!(anthracnose.severity, Severity::High);

        let mildew = &kb.diseases[4];
        assert_eq!(mildew.rules, vec!["G13", "G14", "G12"]);
        assert_eq!(mildew.severity, Severity::Low);
    }

    #[test]
    fn sqlite_rejects_unknown_severity() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO diseases (code, name, solution, severity)
             VALUES ('P99', 'Mystery blight', 'n/a', 'medium')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO disease_rules (disease_code, symptom_code, position)
             VALUES ('P99', 'G01', 1)",
            [],
        )
        .unwrap();

        let err = load_from_sqlite(&conn).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::InvalidEnum { .. }));
    }

    #[test]
    fn sqlite_tolerates_dangling_rule_codes() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO disease_rules (disease_code, symptom_code, position)
             VALUES ('P01', 'G77', 4)",
            [],
        )
        .unwrap();

        let kb = load_from_sqlite(&conn).unwrap();
        assert_eq!(kb.dangling_symptom_codes(), vec!["G77"]);
        assert_eq!(kb.question_for("G77"), "G77");
    }

    #[test]
    fn json_grouped_shape_loads() {
        let kb = from_json_str(CHILI_JSON).unwrap();

        assert_eq!(kb.symptoms.len(), 14);
        assert_eq!(kb.diseases.len(), 5);
        assert_eq!(kb.diseases[2].name, "Leaf curl virus");
        assert_eq!(kb.diseases[2].rules, vec!["G07", "G08", "G09"]);
    }

    #[test]
    fn json_missing_severity_defaults_to_low() {
        let kb = from_json_str(CHILI_JSON).unwrap();

        // P04 and P05 carry no severity field in the JSON.
        assert_eq!(kb.diseases[3].severity, Severity::Low);
        assert_eq!(kb.diseases[4].severity, Severity::Low);
        assert_eq!(kb.diseases[0].severity, Severity::High);
    }

    #[test]
    fn json_missing_questions_section_is_empty_symptoms() {
        let kb = from_json_str(r#"{"goals": []}"#).unwrap();
        assert!(kb.symptoms.is_empty());
        assert!(kb.diseases.is_empty());
    }

    #[test]
    fn json_malformed_input_is_an_error() {
        let err = from_json_str("{not json").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Json(_)));
    }

    #[test]
    fn json_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CHILI_JSON.as_bytes()).unwrap();

        let kb = from_json_file(file.path()).unwrap();
        assert_eq!(kb.diseases.len(), 5);
    }

    #[test]
    fn sqlite_path_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("knowledge.db");

        let kb = load_from_sqlite_path(&path).unwrap();
        assert_eq!(kb.diseases.len(), 5);
    }

    // ── End-to-end runs over the seeded knowledge ──────────

    #[test]
    fn seeded_kb_supports_full_elimination_run() {
        use crate::engine::{
            diagnose, DiagnosisOutcome, InferenceStrategy, Question, SessionOutcome,
        };

        let conn = open_memory_database().unwrap();
        let kb = load_from_sqlite(&conn).unwrap();

        // Confirm exactly the Fusarium wilt observations.
        let mut answers =
            |q: &Question| matches!(q.code.as_str(), "G04" | "G05" | "G06");
        let outcome =
            diagnose(&kb, InferenceStrategy::SequentialElimination, &mut answers).unwrap();

        let DiagnosisOutcome::Eliminated(SessionOutcome::Succeeded { diagnosis, solution }) =
            outcome
        else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(diagnosis, "Fusarium wilt");
        assert!(solution.contains("rotate"));
    }

    #[test]
    fn seeded_kb_ranks_partial_anthracnose_match() {
        use std::collections::HashSet;

        let conn = open_memory_database().unwrap();
        let kb = load_from_sqlite(&conn).unwrap();

        let selected: HashSet<String> = ["G01", "G02"].iter().map(|c| c.to_string()).collect();
        let result = crate::engine::score(&kb.rule_rows(), &selected);

        assert_eq!(result.name, "Anthracnose");
        assert_eq!(result.confidence, 67);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn seeded_kb_shares_leaf_drop_answer_between_goals() {
        use crate::engine::{diagnose, DiagnosisOutcome, InferenceStrategy, Question};

        let conn = open_memory_database().unwrap();
        let kb = load_from_sqlite(&conn).unwrap();

        // G12 belongs to both Cercospora leaf spot and powdery mildew; the
        // "no" given while testing the first goal must eliminate the second
        // without re-asking.
        let mut asked: Vec<String> = Vec::new();
        let mut answers = |q: &Question| {
            asked.push(q.code.clone());
            matches!(q.code.as_str(), "G10" | "G11" | "G13" | "G14")
        };
        let outcome =
            diagnose(&kb, InferenceStrategy::SequentialElimination, &mut answers).unwrap();

        assert!(matches!(outcome, DiagnosisOutcome::Eliminated(o) if !o.success()));
        assert_eq!(
            asked.iter().filter(|code| code.as_str() == "G12").count(),
            1
        );
    }
}
