//! Error types for cashflow-core
//!
//! Every failure the back office can meet is a [`CoreError`]. None of them
//! reach the HTTP layer as a failure: the orchestrator logs them through an
//! [`ErrorLogger`] and turns them into a user-facing notice.

use cashflow_gateway::GatewayError;
use thiserror::Error;

pub const LOG_TARGET: &str = "cashflow::error";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A business rule blocked the action
    ValidationError,
    MissingFields,
    /// The remote answered, but with nothing to show
    NoResults,
    /// Transport failure talking to the remote API
    NetworkError,
    /// The remote answered with something we could not use
    InvalidResponse,
    NotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::MissingFields => "MISSING_FIELDS",
            ErrorCode::NoResults => "NO_RESULTS",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Error, Debug)]
pub enum CoreError {
    /// Message is shown to the user as is
    #[error("{message}")]
    ValidationError { message: String },

    #[error("The following fields are missing: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("{message}")]
    NoResults { message: String },

    #[error("Remote API error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Not found: {what}")]
    NotFound { what: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    pub fn no_results(message: impl Into<String>) -> Self {
        CoreError::NoResults {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::MissingFields { .. } => ErrorCode::MissingFields,
            CoreError::NoResults { .. } => ErrorCode::NoResults,
            CoreError::Gateway(e) if e.is_transport() => ErrorCode::NetworkError,
            CoreError::Gateway(_) => ErrorCode::InvalidResponse,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationError { .. } | CoreError::MissingFields { .. } => ErrorSeverity::Warning,
            CoreError::NoResults { .. } | CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::Gateway(_) => ErrorSeverity::Error,
        }
    }

    /// Whether the message may be shown verbatim to the user
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CoreError::ValidationError { .. } | CoreError::MissingFields { .. } | CoreError::NoResults { .. }
        )
    }

    /// Operator hint appended to error logs
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CoreError::Gateway(e) if e.is_transport() => {
                Some("check that api.base_url points at a reachable forecasting service")
            }
            _ => None,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Where an error happened
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
        }
    }
}

pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Logs through the `log` facade
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match (error.severity(), error.hint()) {
            (ErrorSeverity::Error, Some(hint)) => log::error!(
                target: LOG_TARGET,
                "[{}] {} - operation: {} ({})",
                error.code(),
                error,
                context.operation,
                hint
            ),
            (ErrorSeverity::Error, None) => log::error!(
                target: LOG_TARGET,
                "[{}] {} - operation: {}",
                error.code(),
                error,
                context.operation
            ),
            _ => log::warn!(
                target: LOG_TARGET,
                "[{}] {} - operation: {}",
                error.code(),
                error,
                context.operation
            ),
        }
    }
}
