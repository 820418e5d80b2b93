use clap::Parser;
use variant_assigner::core::output::{write_assignments, write_report};
use variant_assigner::utils::error::{AssignerError, ErrorSeverity};
use variant_assigner::utils::{logger, validation::Validate};
use variant_assigner::{
    AssignmentEngine, CliConfig, DistributionReport, Experiment, ExperimentDefinition,
    ExperimentProvider, InlineExperiment, TomlConfig,
};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting variant-assigner");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Assignment failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: &CliConfig) -> Result<(), AssignerError> {
    config.validate()?;

    match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading experiments from: {}", path);
            let mut registry = TomlConfig::from_file(path)?.into_registry()?;
            if let Some(name) = &config.experiment {
                registry = registry.retain_only(name)?;
            }
            execute(AssignmentEngine::new(registry), config)
        }
        None => {
            // validate() 已確認兩者存在
            let (Some(name), Some(variants)) = (&config.experiment, config.variants) else {
                return Err(AssignerError::MissingConfigError {
                    field: "experiment".to_string(),
                });
            };
            let definition = ExperimentDefinition::enabled(Experiment::new(name.clone(), variants)?);
            execute(AssignmentEngine::new(InlineExperiment::new(definition)), config)
        }
    }
}

fn execute<P: ExperimentProvider>(
    engine: AssignmentEngine<P>,
    config: &CliConfig,
) -> Result<(), AssignerError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(sample_size) = config.simulate {
        for definition in engine.provider().experiments() {
            let report = DistributionReport::simulate(&definition.experiment, sample_size)?;
            if !report.is_uniform(config.alpha)? {
                tracing::warn!(
                    "⚠️ '{}' failed the uniformity check (chi-squared {:.3})",
                    report.experiment,
                    report.chi_squared
                );
            }
            write_report(&mut out, &report, config.alpha, config.format)?;
        }
        return Ok(());
    }

    let participants = config.participants()?;
    let assignments = engine.assign_all(&participants);
    write_assignments(&mut out, &assignments, config.format)?;

    tracing::info!("✅ Wrote {} assignments", assignments.len());
    Ok(())
}
