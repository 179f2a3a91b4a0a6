//! Error types for the journal portal

use thiserror::Error;

/// Coarse failure classification shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection refused, DNS failure, broken transport
    Network,
    Timeout,
    /// Non-2xx HTTP status
    Http,
    /// Envelope with `code != 200`
    Business,
    /// Rejected client-side before any request was made
    Validation,
    /// Duplicate submission while a request is in flight
    Busy,
    /// Malformed response body
    Decode,
    Session,
    Io,
    Config,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request rejected ({code}): {message}")]
    Business { code: i64, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Another request is already in progress")]
    Busy,

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Network(_) => FailureKind::Network,
            AppError::Timeout => FailureKind::Timeout,
            AppError::Http { .. } => FailureKind::Http,
            AppError::Business { .. } => FailureKind::Business,
            AppError::Validation(_) => FailureKind::Validation,
            AppError::Busy => FailureKind::Busy,
            AppError::Decode(_) => FailureKind::Decode,
            AppError::Session(_) => FailureKind::Session,
            AppError::Io(_) | AppError::Export(_) => FailureKind::Io,
            AppError::Config(_) => FailureKind::Config,
        }
    }

    /// Message suitable for a blocking alert
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Network error, please retry later".to_string(),
            AppError::Timeout => "Request timed out, please check your network connection".to_string(),
            AppError::Http { message, .. } => message.clone(),
            AppError::Business { message, .. } => message.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Busy => "A request is already being sent, please wait".to_string(),
            AppError::Decode(_) => "The server returned an unexpected response".to_string(),
            other => other.to_string(),
        }
    }

    /// Build an HTTP-level error, using canned text for 404 and 500
    pub fn http(status: u16, body_message: Option<String>) -> Self {
        let message = match status {
            404 => "The requested endpoint does not exist".to_string(),
            500 => "Internal server error, please contact the administrator".to_string(),
            _ => body_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("Request failed with HTTP status {}", status)),
        };
        AppError::Http { status, message }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout
        } else if e.is_decode() {
            AppError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::http(status.as_u16(), None)
        } else {
            AppError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        if messages.is_empty() {
            messages.push("Invalid form".to_string());
        }
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for portal operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_canned_messages() {
        assert_eq!(
            AppError::http(404, Some("ignored".into())).user_message(),
            "The requested endpoint does not exist"
        );
        assert_eq!(
            AppError::http(500, None).user_message(),
            "Internal server error, please contact the administrator"
        );
        assert_eq!(
            AppError::http(403, Some("No permission".into())).user_message(),
            "No permission"
        );
        assert_eq!(
            AppError::http(418, None).user_message(),
            "Request failed with HTTP status 418"
        );
    }

    #[test]
    fn test_business_message_is_verbatim() {
        let err = AppError::Business {
            code: 400,
            message: "Journal has no available copies".into(),
        };
        assert_eq!(err.kind(), FailureKind::Business);
        assert_eq!(err.user_message(), "Journal has no available copies");
    }

    #[test]
    fn test_timeout_kind() {
        assert_eq!(AppError::Timeout.kind(), FailureKind::Timeout);
        assert_ne!(AppError::Timeout.kind(), FailureKind::Network);
    }
}
