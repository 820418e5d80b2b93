pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::distribution::DEFAULT_ALPHA;
#[cfg(feature = "cli")]
use crate::core::engine::Participant;
#[cfg(feature = "cli")]
use crate::core::output::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::{AssignerError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_range, validate_required_field, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::ffi::OsString;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "variant-assigner")]
#[command(about = "Deterministically assign participants to experiment variants")]
pub struct CliConfig {
    /// TOML file with [[experiments]] entries
    #[arg(short, long)]
    pub config: Option<String>,

    /// Experiment name (selects one registry entry when --config is given)
    #[arg(short, long)]
    pub experiment: Option<String>,

    /// Number of variants for an inline experiment
    #[arg(long)]
    pub variants: Option<u64>,

    /// Participant id, may be repeated
    #[arg(short, long = "participant")]
    pub participants: Vec<OsString>,

    /// File with one participant id per line
    #[arg(long)]
    pub participants_file: Option<PathBuf>,

    /// Bucket N synthetic participants and report the distribution
    #[arg(long, value_name = "N")]
    pub simulate: Option<u64>,

    /// Significance level for the uniformity check
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Participants from flags followed by those from --participants-file.
    pub fn participants(&self) -> Result<Vec<Participant>> {
        let mut participants: Vec<Participant> = self
            .participants
            .iter()
            .map(|p| Participant::from_bytes(p.as_encoded_bytes()))
            .collect();

        if let Some(path) = &self.participants_file {
            participants.extend(cli::read_participants_file(path)?);
        }

        Ok(participants)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.config {
            Some(path) => {
                validate_path("config", path)?;
                // 變體數由註冊表決定
                if let Some(variants) = self.variants {
                    return Err(AssignerError::InvalidConfigValueError {
                        field: "variants".to_string(),
                        value: variants.to_string(),
                        reason: "--variants cannot be combined with --config".to_string(),
                    });
                }
            }
            None => {
                let experiment = validate_required_field("experiment", &self.experiment)?;
                let variants = *validate_required_field("variants", &self.variants)?;
                if variants == 0 {
                    return Err(AssignerError::InvalidVariantCount {
                        experiment: experiment.clone(),
                        variants,
                    });
                }
            }
        }

        validate_range("alpha", self.alpha, 1e-6, 0.5)?;

        if self.simulate.is_none() && self.participants.is_empty() && self.participants_file.is_none() {
            return Err(AssignerError::MissingConfigError {
                field: "participant (or --participants-file / --simulate)".to_string(),
            });
        }

        Ok(())
    }
}
