use crate::core::engine::Participant;
use crate::core::{ExperimentDefinition, ExperimentProvider};
use crate::utils::error::Result;
use std::path::Path;

/// A single experiment given directly on the command line.
#[derive(Debug, Clone)]
pub struct InlineExperiment {
    definition: ExperimentDefinition,
}

impl InlineExperiment {
    pub fn new(definition: ExperimentDefinition) -> Self {
        Self { definition }
    }
}

impl ExperimentProvider for InlineExperiment {
    fn experiment(&self, name: &str) -> Option<&ExperimentDefinition> {
        (self.definition.name() == name).then_some(&self.definition)
    }

    fn experiments(&self) -> Vec<&ExperimentDefinition> {
        vec![&self.definition]
    }
}

/// One participant id per line. Blank lines are skipped; bytes are kept as-is
/// so lines that are not UTF-8 still reach the assigner.
pub fn read_participants_file<P: AsRef<Path>>(path: P) -> Result<Vec<Participant>> {
    let data = std::fs::read(&path)?;

    let participants: Vec<Participant> = data
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(Participant::from_bytes)
        .collect();

    tracing::debug!(
        "Read {} participants from {}",
        participants.len(),
        path.as_ref().display()
    );

    Ok(participants)
}
