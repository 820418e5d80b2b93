use crate::utils::error::{AssignerError, Result};
use serde::{Deserialize, Serialize};

/// An experiment with an arbitrary number of variants.
///
/// Variants carry no meaning of their own; they are plain bucket indices in
/// `[0, variants)` that the caller maps to behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Experiment {
    name: String,
    variants: u64,
}

impl Experiment {
    pub fn new(name: impl Into<String>, variants: u64) -> Result<Self> {
        let name = name.into();
        if variants == 0 {
            return Err(AssignerError::InvalidVariantCount {
                experiment: name,
                variants,
            });
        }
        Ok(Self { name, variants })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> u64 {
        self.variants
    }
}

/// A registered experiment together with its rollout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDefinition {
    pub experiment: Experiment,
    pub description: Option<String>,
    pub enabled: bool,
    pub fallback_variant: u64,
}

impl ExperimentDefinition {
    pub fn enabled(experiment: Experiment) -> Self {
        Self {
            experiment,
            description: None,
            enabled: true,
            fallback_variant: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.experiment.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentReason {
    /// 由雜湊分桶決定
    Hashed,
    /// 實驗停用，回傳預設變體
    Fallback,
}

impl std::fmt::Display for AssignmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentReason::Hashed => write!(f, "hashed"),
            AssignmentReason::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub experiment: String,
    pub participant: String,
    pub variant: u64,
    /// Hex of the eight digest bytes folded into the bucket; empty for fallbacks.
    pub hash: String,
    pub reason: AssignmentReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_variants_rejected() {
        let err = Experiment::new("exp-a", 0).unwrap_err();
        assert!(matches!(
            err,
            AssignerError::InvalidVariantCount { ref experiment, variants: 0 } if experiment == "exp-a"
        ));
    }

    #[test]
    fn test_empty_name_is_legal() {
        let experiment = Experiment::new("", 3).unwrap();
        assert_eq!(experiment.name(), "");
        assert_eq!(experiment.variants(), 3);
    }

    #[test]
    fn test_assignment_reason_serializes_snake_case() {
        let json = serde_json::to_string(&AssignmentReason::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
    }
}
