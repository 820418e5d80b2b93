pub mod assigner;
pub mod distribution;
pub mod engine;
pub mod output;

pub use crate::domain::model::{Assignment, AssignmentReason, Experiment, ExperimentDefinition};
pub use crate::domain::ports::ExperimentProvider;
pub use crate::utils::error::Result;
