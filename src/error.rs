//! Error types and handling for the `GeoAssist` application

use thiserror::Error;

/// Main error type for the `GeoAssist` application
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Geocoding service returned an error status or unusable payload
    #[error("API error: {message}")]
    Api { message: String },

    /// Transport-level failures talking to a geocoding service
    #[error("Network error: {message}")]
    Network { message: String },

    /// Response bodies or map addresses that could not be parsed
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AssistantError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AssistantError::Api { .. } | AssistantError::Network { .. } => {
                "Unable to reach the geocoding services. Please check your internet connection."
                    .to_string()
            }
            AssistantError::Parse { message } => format!("Unexpected data: {message}"),
            AssistantError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AssistantError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
