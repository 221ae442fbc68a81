//! User-facing notices
//!
//! Every back-office operation ends in a [`Notice`]; the web layer renders it
//! as a toast. Errors never travel further than this.

use crate::error::{CoreError, ErrorSeverity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, "Success", message)
    }

    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, "Warning", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, "Error", message)
    }

    /// Notice for an error; remote failures are replaced by `fallback`
    pub fn from_error(error: &CoreError, fallback: &str) -> Self {
        match error {
            CoreError::MissingFields { .. } => Self::new(NoticeLevel::Warning, "Missing Field", error.to_string()),
            CoreError::NoResults { message } => Self::info("No Results", message.clone()),
            _ if error.is_user_facing() => match error.severity() {
                ErrorSeverity::Info => Self::info("Notice", error.to_string()),
                _ => Self::warning(error.to_string()),
            },
            _ => Self::error(fallback),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_gateway::GatewayError;

    #[test]
    fn test_validation_becomes_warning() {
        let notice = Notice::from_error(&CoreError::validation("Please enter a rejection reason"), "unused");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Please enter a rejection reason");
    }

    #[test]
    fn test_remote_failure_uses_fallback() {
        let error = CoreError::from(GatewayError::Decode("bad json".to_string()));
        let notice = Notice::from_error(&error, "An error occurred while rejecting the entry.");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.message, "An error occurred while rejecting the entry.");
    }

    #[test]
    fn test_missing_fields_title() {
        let error = CoreError::MissingFields {
            fields: vec!["narration".to_string()],
        };
        let notice = Notice::from_error(&error, "unused");
        assert_eq!(notice.title, "Missing Field");
        assert!(notice.message.contains("narration"));
    }
}
