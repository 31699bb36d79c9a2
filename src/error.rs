//! Error types for remote calls and configuration

use std::fmt;

/// Which remote operation failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Verb phrase for user-facing messages ("fetch items", "create item")
    fn describe(&self, noun: &str) -> String {
        match self {
            Operation::List => format!("fetch {}s", noun),
            Operation::Get => format!("fetch {}", noun),
            Operation::Create => format!("create {}", noun),
            Operation::Update => format!("update {}", noun),
            Operation::Delete => format!("delete {}", noun),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{operation} request failed with HTTP {status}")]
    RequestFailed { operation: Operation, status: u16 },

    #[error("{operation} request could not be sent: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} response could not be decoded: {message}")]
    Decode { operation: Operation, message: String },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::RequestFailed { operation, .. } => *operation,
            ApiError::Transport { operation, .. } => *operation,
            ApiError::Decode { operation, .. } => *operation,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message shown in the error banner
    pub fn user_message(&self, noun: &str) -> String {
        let what = self.operation().describe(noun);
        match self {
            ApiError::RequestFailed { status, .. } => {
                format!("Failed to {} (HTTP {})", what, status)
            }
            ApiError::Transport { source, .. } => {
                if source.is_timeout() {
                    format!("Failed to {}: request timed out", what)
                } else if source.is_connect() {
                    format!("Failed to {}: could not connect to server", what)
                } else {
                    format!("Failed to {}: {}", what, source)
                }
            }
            ApiError::Decode { message, .. } => {
                format!("Failed to {}: unexpected response ({})", what, message)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("IO error reading config: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_message_carries_status() {
        let err = ApiError::RequestFailed {
            operation: Operation::Create,
            status: 500,
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message("item"), "Failed to create item (HTTP 500)");
        assert_eq!(err.to_string(), "create request failed with HTTP 500");
    }

    #[test]
    fn test_list_message_is_plural() {
        let err = ApiError::Decode {
            operation: Operation::List,
            message: "expected array".into(),
        };
        assert_eq!(err.status(), None);
        assert!(err.user_message("todo").starts_with("Failed to fetch todos"));
    }
}
