use crate::utils::error::{AssignerError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AssignerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AssignerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AssignerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AssignerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssignerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AssignerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("variants", 5, 1).is_ok());
        assert!(validate_positive_number("variants", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("experiments.name", "exp-a").is_ok());
        assert!(validate_non_empty_string("experiments.name", "").is_err());
        assert!(validate_non_empty_string("experiments.name", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("fallback_variant", 3u64, 0, 3).is_ok());
        assert!(validate_range("fallback_variant", 4u64, 0, 3).is_err());
        assert!(validate_range("alpha", 0.001f64, 1e-6, 0.5).is_ok());
        assert!(validate_range("alpha", 0.9f64, 1e-6, 0.5).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(4u64);
        let missing: Option<u64> = None;
        assert_eq!(*validate_required_field("variants", &present).unwrap(), 4);
        assert!(matches!(
            validate_required_field("variants", &missing),
            Err(AssignerError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("config", "experiments.toml").is_ok());
        assert!(validate_path("config", "").is_err());
        assert!(validate_path("config", "bad\0path").is_err());
    }
}
