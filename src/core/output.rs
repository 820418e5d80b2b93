use crate::core::distribution::DistributionReport;
use crate::domain::model::Assignment;
use crate::utils::error::{AssignerError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = AssignerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(AssignerError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

pub fn write_assignments<W: Write>(
    writer: &mut W,
    assignments: &[Assignment],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for a in assignments {
                writeln!(
                    writer,
                    "{}\t{}\tvariant={}\t{}",
                    a.experiment, a.participant, a.variant, a.reason
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, assignments)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *writer);
            for a in assignments {
                csv_writer.serialize(a)?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &DistributionReport,
    alpha: f64,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let uniform = report.is_uniform(alpha)?;
            writeln!(
                writer,
                "{} ({} variants, {} participants)",
                report.experiment, report.variants, report.sample_size
            )?;
            for (variant, count) in report.counts.iter().enumerate() {
                writeln!(writer, "  variant {:>3}: {}", variant, count)?;
            }
            writeln!(
                writer,
                "  expected {:.1}, chi-squared {:.3} (df {}), max deviation {:.2}%",
                report.expected,
                report.chi_squared,
                report.degrees_of_freedom,
                report.max_deviation * 100.0
            )?;
            writeln!(
                writer,
                "  uniform at alpha={}: {}",
                alpha,
                if uniform { "yes" } else { "no" }
            )?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *writer);
            csv_writer.write_record(["variant", "count"])?;
            for (variant, count) in report.counts.iter().enumerate() {
                csv_writer.write_record([variant.to_string(), count.to_string()])?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}
