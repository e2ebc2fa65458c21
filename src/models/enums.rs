use serde::{Deserialize, Serialize};

use crate::kb::KnowledgeBaseError;

/// How urgently a disease needs intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = KnowledgeBaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(KnowledgeBaseError::InvalidEnum {
                field: "Severity".into(),
                value: s.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn severity_round_trips_through_str() {
        for severity in [Severity::Low, Severity::High] {
            assert_eq!(Severity::from_str(severity.as_str()).unwrap(), severity);
        }
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let err = Severity::from_str("medium").unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::InvalidEnum { .. }));
    }

    #[test]
    fn severity_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }
}
