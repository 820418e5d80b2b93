use crate::core::{Experiment, ExperimentDefinition, ExperimentProvider};
use crate::utils::error::{AssignerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub registry: Option<RegistryInfo>,
    #[serde(default)]
    pub experiments: Vec<ExperimentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentEntry {
    pub name: String,
    pub variants: u64,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub fallback_variant: Option<u64>,
}

impl TryFrom<&ExperimentEntry> for ExperimentDefinition {
    type Error = AssignerError;

    fn try_from(entry: &ExperimentEntry) -> Result<Self> {
        Ok(ExperimentDefinition {
            experiment: Experiment::new(entry.name.clone(), entry.variants)?,
            description: entry.description.clone(),
            enabled: entry.enabled.unwrap_or(true),
            fallback_variant: entry.fallback_variant.unwrap_or(0),
        })
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssignerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AssignerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VARIANTS})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssignerError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for entry in &self.experiments {
            validate_non_empty_string("experiments.name", &entry.name)?;
            validate_positive_number(&format!("experiments.{}.variants", entry.name), entry.variants, 1)?;

            if let Some(fallback) = entry.fallback_variant {
                validate_range(
                    &format!("experiments.{}.fallback_variant", entry.name),
                    fallback,
                    0,
                    entry.variants - 1,
                )?;
            }

            if !seen.insert(entry.name.as_str()) {
                return Err(AssignerError::DuplicateExperiment {
                    name: entry.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// 驗證後轉換成可查詢的實驗註冊表
    pub fn into_registry(self) -> Result<ExperimentRegistry> {
        self.validate()?;

        let definitions = self
            .experiments
            .iter()
            .map(ExperimentDefinition::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} experiments from registry '{}'",
            definitions.len(),
            self.registry.as_ref().map(|r| r.name.as_str()).unwrap_or("unnamed")
        );

        Ok(ExperimentRegistry { definitions })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Validated set of experiment definitions.
#[derive(Debug, Clone, Default)]
pub struct ExperimentRegistry {
    definitions: Vec<ExperimentDefinition>,
}

impl ExperimentRegistry {
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Keep only the named experiment.
    pub fn retain_only(self, name: &str) -> Result<Self> {
        let definitions: Vec<_> = self
            .definitions
            .into_iter()
            .filter(|d| d.name() == name)
            .collect();

        if definitions.is_empty() {
            return Err(AssignerError::UnknownExperiment {
                name: name.to_string(),
            });
        }
        Ok(Self { definitions })
    }
}

impl ExperimentProvider for ExperimentRegistry {
    fn experiment(&self, name: &str) -> Option<&ExperimentDefinition> {
        self.definitions.iter().find(|d| d.name() == name)
    }

    fn experiments(&self) -> Vec<&ExperimentDefinition> {
        self.definitions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[registry]
name = "mobile"
description = "Client experiments"

[[experiments]]
name = "exp-a"
variants = 4

[[experiments]]
name = "threads"
variants = 2
enabled = false
fallback_variant = 1
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.registry.as_ref().unwrap().name, "mobile");
        assert_eq!(config.experiments.len(), 2);
        assert!(config.validate().is_ok());

        let registry = config.into_registry().unwrap();
        let threads = registry.experiment("threads").unwrap();
        assert!(!threads.enabled);
        assert_eq!(threads.fallback_variant, 1);
        assert!(registry.experiment("exp-a").unwrap().enabled);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VARIANT_ASSIGNER_TEST_VARIANTS", "6");

        let toml_content = r#"
[[experiments]]
name = "exp-env"
variants = ${VARIANT_ASSIGNER_TEST_VARIANTS}
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.experiments[0].variants, 6);

        std::env::remove_var("VARIANT_ASSIGNER_TEST_VARIANTS");
    }

    #[test]
    fn test_zero_variants_fails_validation() {
        let toml_content = r#"
[[experiments]]
name = "broken"
variants = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
        assert!(config.into_registry().is_err());
    }

    #[test]
    fn test_fallback_out_of_range() {
        let toml_content = r#"
[[experiments]]
name = "exp-a"
variants = 2
fallback_variant = 2
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AssignerError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let toml_content = r#"
[[experiments]]
name = "exp-a"
variants = 2

[[experiments]]
name = "exp-a"
variants = 3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AssignerError::DuplicateExperiment { ref name }) if name == "exp-a"
        ));
    }

    #[test]
    fn test_retain_only() {
        let registry = TomlConfig::from_toml_str(BASIC).unwrap().into_registry().unwrap();
        let narrowed = registry.clone().retain_only("exp-a").unwrap();
        assert_eq!(narrowed.len(), 1);
        assert!(registry.retain_only("missing").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.experiments[0].name, "exp-a");
    }
}
