//! Bucket histograms and a chi-squared goodness-of-fit check against the
//! uniform distribution.

use crate::domain::model::Experiment;
use crate::utils::error::{AssignerError, Result};
use crate::utils::validation::validate_range;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_ALPHA: f64 = 0.001;

/// Upper bound on the histogram size `simulate` will allocate.
pub const MAX_SIMULATED_VARIANTS: u64 = 1_000_000;

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub experiment: String,
    pub variants: u64,
    pub sample_size: u64,
    pub counts: Vec<u64>,
    pub expected: f64,
    pub chi_squared: f64,
    pub degrees_of_freedom: u64,
    /// Largest relative deviation of any bucket from `expected`.
    pub max_deviation: f64,
    pub generated_at: DateTime<Utc>,
}

impl DistributionReport {
    /// Bucket `participant-0 .. participant-{n-1}` and summarize the result.
    pub fn simulate(experiment: &Experiment, sample_size: u64) -> Result<Self> {
        if sample_size == 0 {
            return Err(AssignerError::InvalidConfigValueError {
                field: "simulate".to_string(),
                value: "0".to_string(),
                reason: "Sample size must be at least 1".to_string(),
            });
        }

        if experiment.variants() > MAX_SIMULATED_VARIANTS {
            return Err(AssignerError::InvalidConfigValueError {
                field: "variants".to_string(),
                value: experiment.variants().to_string(),
                reason: format!(
                    "Simulation supports at most {} variants",
                    MAX_SIMULATED_VARIANTS
                ),
            });
        }

        let mut counts = vec![0u64; experiment.variants() as usize];
        for i in 0..sample_size {
            let variant = experiment.variant(&format!("participant-{}", i));
            counts[variant as usize] += 1;
        }

        tracing::debug!(
            "Simulated {} participants for '{}': {:?}",
            sample_size,
            experiment.name(),
            counts
        );

        Self::from_counts(experiment.name(), counts)
    }

    pub fn from_counts(experiment: &str, counts: Vec<u64>) -> Result<Self> {
        let sample_size: u64 = counts.iter().sum();
        if counts.is_empty() || sample_size == 0 {
            return Err(AssignerError::InvalidConfigValueError {
                field: "counts".to_string(),
                value: format!("{:?}", counts),
                reason: "Histogram must contain at least one observation".to_string(),
            });
        }

        let variants = counts.len() as u64;
        let expected = sample_size as f64 / variants as f64;

        let chi_squared = counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        let max_deviation = counts
            .iter()
            .map(|&observed| (observed as f64 - expected).abs() / expected)
            .fold(0.0, f64::max);

        Ok(Self {
            experiment: experiment.to_string(),
            variants,
            sample_size,
            counts,
            expected,
            chi_squared,
            degrees_of_freedom: variants - 1,
            max_deviation,
            generated_at: Utc::now(),
        })
    }

    /// Approximate chi-squared critical value at significance `alpha`.
    pub fn critical_value(&self, alpha: f64) -> Result<f64> {
        validate_range("alpha", alpha, 1e-6, 0.5)?;
        Ok(chi_squared_critical(self.degrees_of_freedom, alpha))
    }

    /// Whether uniformity is not rejected at significance `alpha`.
    pub fn is_uniform(&self, alpha: f64) -> Result<bool> {
        if self.degrees_of_freedom == 0 {
            return Ok(true);
        }
        Ok(self.chi_squared <= self.critical_value(alpha)?)
    }
}

/// Wilson–Hilferty approximation of the upper `alpha` quantile.
fn chi_squared_critical(degrees_of_freedom: u64, alpha: f64) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }
    let k = degrees_of_freedom as f64;
    let z = z_score_for_alpha(alpha);
    let h = 2.0 / (9.0 * k);
    k * (1.0 - h + z * h.sqrt()).powi(3)
}

// 常態分佈上尾分位數的有理近似
fn z_score_for_alpha(alpha: f64) -> f64 {
    if alpha <= 0.5 {
        let t = (-2.0 * alpha.ln()).sqrt();
        t - (2.515517 + 0.802853 * t + 0.010328 * t.powi(2))
            / (1.0 + 1.432788 * t + 0.189269 * t.powi(2) + 0.001308 * t.powi(3))
    } else {
        -z_score_for_alpha(1.0 - alpha)
    }
}
