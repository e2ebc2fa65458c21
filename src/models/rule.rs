use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// One denormalized (disease, symptom) association, as produced by the
/// knowledge-base JOIN. The forward scorer consumes these rows directly;
/// disease display metadata is carried on every row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRow {
    pub disease_code: String,
    pub disease_name: String,
    pub solution: String,
    pub severity: Severity,
    pub symptom_code: String,
}
