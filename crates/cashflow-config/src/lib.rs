//! Configuration management for cashflow-web
//!
//! This module handles loading, validation, and management of
//! the back-office configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::{ConfigError, ConfigErrorCode, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8084
}

/// Remote forecasting API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/CashflowForecastingApplication/api/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ApiConfig {
    /// Base URL guaranteed to end with a single `/`
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

/// Listing page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Status shown when the listing is first opened
    #[serde(default)]
    pub default_status: WorkflowStatus,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_status: WorkflowStatus::default(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

/// Entry editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Currency used when a loaded entry has none
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// How many corporates the picker fetches at once
    #[serde(default = "default_corporate_page_size")]
    pub corporate_page_size: u32,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            corporate_page_size: default_corporate_page_size(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_corporate_page_size() -> u32 {
    400
}

/// Summary dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Length of the forecast window opened by a date pick
    #[serde(default = "default_forecast_months")]
    pub forecast_months: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_months: default_forecast_months(),
        }
    }
}

fn default_forecast_months() -> u32 {
    6
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Workflow status of a forecast entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Awaiting authorization
    #[default]
    Pending,
    /// Rejected with a reason
    Rejected,
    /// Authorized and waiting for review
    Review,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 3] = [
        WorkflowStatus::Pending,
        WorkflowStatus::Rejected,
        WorkflowStatus::Review,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "Pending",
            WorkflowStatus::Rejected => "Rejected",
            WorkflowStatus::Review => "Review",
        }
    }
}

impl std::str::FromStr for WorkflowStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(WorkflowStatus::Pending),
            "rejected" | "reject" => Ok(WorkflowStatus::Rejected),
            "review" => Ok(WorkflowStatus::Review),
            _ => Err(format!("Invalid workflow status: {}", s)),
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Pending => write!(f, "pending"),
            WorkflowStatus::Rejected => write!(f, "rejected"),
            WorkflowStatus::Review => write!(f, "review"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Listing settings
    #[serde(default)]
    pub listing: ListingConfig,
    /// Entry editor settings
    #[serde(default)]
    pub entry: EntryConfig,
    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                    path: path.display().to_string(),
                },
                _ => ConfigError::Unreadable {
                    path: path.display().to_string(),
                    source: e,
                },
            })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML content
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "api.base_url".to_string(),
            });
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.listing.page_size == 0 || self.listing.page_size > 500 {
            return Err(ConfigError::InvalidValue {
                field: "listing.page_size".to_string(),
                reason: "Page size must be between 1 and 500".to_string(),
            });
        }

        if self.entry.corporate_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "entry.corporate_page_size".to_string(),
                reason: "Corporate page size must be greater than 0".to_string(),
            });
        }

        if self.dashboard.forecast_months == 0 || self.dashboard.forecast_months > 24 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.forecast_months".to_string(),
                reason: "Forecast window must be between 1 and 24 months".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8084);
        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.listing.default_status, WorkflowStatus::Pending);
        assert_eq!(config.entry.default_currency, "INR");
        assert_eq!(config.entry.corporate_page_size, 400);
        assert_eq!(config.dashboard.forecast_months, 6);
    }

    #[test]
    fn test_bundled_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert!(config.api.base_url.starts_with("http"));
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
api:
  base_url: "https://forecast.example.com/api"
listing:
  page_size: 25
  default_status: review
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.normalized_base_url(), "https://forecast.example.com/api/");
        assert_eq!(config.listing.page_size, 25);
        assert_eq!(config.listing.default_status, WorkflowStatus::Review);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::InvalidYaml(_))));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = Config::from_yaml("api:\n  base_url: \"ftp://nowhere\"\n");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "api.base_url"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let result = Config::from_yaml("listing:\n  page_size: 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_rejects_long_forecast_window() {
        let result = Config::from_yaml("dashboard:\n  forecast_months: 36\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = Config::load(Path::new("/definitely/not/here.yaml")).await;
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9100").unwrap();
        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[tokio::test]
    async fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path()).await;
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn test_workflow_status_parse() {
        assert_eq!("Pending".parse::<WorkflowStatus>().unwrap(), WorkflowStatus::Pending);
        assert_eq!("reject".parse::<WorkflowStatus>().unwrap(), WorkflowStatus::Rejected);
        assert_eq!(WorkflowStatus::Review.to_string(), "review");
        assert!("archived".parse::<WorkflowStatus>().is_err());
    }
}
