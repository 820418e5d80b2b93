pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::cli::InlineExperiment;
pub use crate::config::toml_config::{ExperimentRegistry, TomlConfig};
pub use crate::core::assigner::variant;
pub use crate::core::distribution::DistributionReport;
pub use crate::core::engine::{AssignmentEngine, Participant};
pub use crate::core::output::OutputFormat;
pub use crate::domain::model::{Assignment, AssignmentReason, Experiment, ExperimentDefinition};
pub use crate::domain::ports::ExperimentProvider;
pub use crate::utils::error::{AssignerError, Result};
