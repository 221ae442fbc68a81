//! Error types for cashflow-config

use thiserror::Error;

/// Stable code per failure kind, printed in startup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    FileNotFound,
    Unreadable,
    InvalidYaml,
    MissingField,
    InvalidValue,
}

impl ConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigErrorCode::FileNotFound => "CONFIG_NOT_FOUND",
            ConfigErrorCode::Unreadable => "CONFIG_UNREADABLE",
            ConfigErrorCode::InvalidYaml => "CONFIG_INVALID_YAML",
            ConfigErrorCode::MissingField => "CONFIG_MISSING_FIELD",
            ConfigErrorCode::InvalidValue => "CONFIG_INVALID_VALUE",
        }
    }
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::Unreadable { .. } => ConfigErrorCode::Unreadable,
            ConfigError::InvalidYaml(_) => ConfigErrorCode::InvalidYaml,
            ConfigError::MissingField { .. } => ConfigErrorCode::MissingField,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
        }
    }

    /// What the operator should do about it, if anything obvious
    pub fn hint(&self) -> Option<String> {
        match self {
            ConfigError::FileNotFound { .. } => Some(
                "Point --config at an existing file, or create one with --print-default-config.".to_string(),
            ),
            ConfigError::MissingField { field } => Some(format!("Add '{}' to the config file.", field)),
            ConfigError::InvalidValue { field, .. } => Some(format!("Fix '{}' in the config file.", field)),
            ConfigError::Unreadable { .. } | ConfigError::InvalidYaml(_) => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let error = ConfigError::MissingField { field: "api.base_url".to_string() };
        assert_eq!(error.code(), ConfigErrorCode::MissingField);
        assert_eq!(error.code().to_string(), "CONFIG_MISSING_FIELD");
    }

    #[test]
    fn test_yaml_error_converts() {
        let yaml_error = serde_yaml::from_str::<u32>("[1, 2").unwrap_err();
        let error: ConfigError = yaml_error.into();
        assert_eq!(error.code(), ConfigErrorCode::InvalidYaml);
        assert!(error.hint().is_none());
    }

    #[test]
    fn test_hints_name_the_field() {
        let error = ConfigError::InvalidValue {
            field: "listing.page_size".to_string(),
            reason: "Page size must be between 1 and 500".to_string(),
        };
        assert!(error.hint().unwrap().contains("listing.page_size"));
        assert!(error.to_string().contains("between 1 and 500"));
    }
}
