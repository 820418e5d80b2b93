use crate::domain::model::ExperimentDefinition;

/// Source of experiment definitions, looked up by name.
pub trait ExperimentProvider: Send + Sync {
    fn experiment(&self, name: &str) -> Option<&ExperimentDefinition>;

    /// All definitions in declaration order, disabled ones included.
    fn experiments(&self) -> Vec<&ExperimentDefinition>;
}
