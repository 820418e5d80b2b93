use crate::core::assigner::digest_prefix;
use crate::core::ExperimentProvider;
use crate::domain::model::{Assignment, AssignmentReason, ExperimentDefinition};
use crate::utils::error::{AssignerError, Result};

/// A participant id as it arrived, before any encoding check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    raw: Vec<u8>,
}

impl Participant {
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Display form; invalid UTF-8 is shown with replacement characters.
    pub fn display(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

impl From<&str> for Participant {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }
}

impl From<String> for Participant {
    fn from(value: String) -> Self {
        Self::from_bytes(value.into_bytes())
    }
}

pub struct AssignmentEngine<P: ExperimentProvider> {
    provider: P,
}

impl<P: ExperimentProvider> AssignmentEngine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Assign one participant to the named experiment.
    pub fn assign(&self, experiment_name: &str, participant: &Participant) -> Result<Assignment> {
        let definition = self.provider.experiment(experiment_name).ok_or_else(|| {
            AssignerError::UnknownExperiment {
                name: experiment_name.to_string(),
            }
        })?;

        Ok(Self::assign_definition(definition, participant))
    }

    /// Assign every participant to every experiment the provider knows.
    pub fn assign_all(&self, participants: &[Participant]) -> Vec<Assignment> {
        let definitions = self.provider.experiments();
        let mut assignments = Vec::with_capacity(definitions.len() * participants.len());

        for definition in &definitions {
            for participant in participants {
                assignments.push(Self::assign_definition(definition, participant));
            }
        }

        tracing::info!(
            "Assigned {} participants across {} experiments ({} assignments)",
            participants.len(),
            definitions.len(),
            assignments.len()
        );

        assignments
    }

    fn assign_definition(definition: &ExperimentDefinition, participant: &Participant) -> Assignment {
        let name = definition.name();

        if !definition.enabled {
            tracing::debug!(
                "Experiment '{}' disabled, using fallback variant {}",
                name,
                definition.fallback_variant
            );
            return Assignment {
                experiment: name.to_string(),
                participant: participant.display(),
                variant: definition.fallback_variant,
                hash: String::new(),
                reason: AssignmentReason::Fallback,
            };
        }

        let prefix = digest_prefix(participant.as_bytes(), name);
        let variant = definition.experiment.bucket(&prefix);
        let hash = hex::encode(prefix);

        tracing::debug!(
            "{} -> {}: variant {} (hash {})",
            participant.display(),
            name,
            variant,
            hash
        );

        Assignment {
            experiment: name.to_string(),
            participant: participant.display(),
            variant,
            hash,
            reason: AssignmentReason::Hashed,
        }
    }
}
