use thiserror::Error;

pub const PROVIDER_NAME: &str = "StormGlass";

/// Failures returned by the StormGlass client. Callers match on the variant to decide
/// whether to retry, surface the message, or give up; the client itself never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Something broke before the request reached StormGlass, or the reply could not be read.
    #[error("Unexpected error when trying to communicate to StormGlass: {0}")]
    ClientRequest(String),

    /// StormGlass answered with a non-success status.
    #[error("Unexpected error returned by the StormGlass service: {0}")]
    Response(String),

    /// A transport-successful reply that makes no sense. Not raised by the client itself.
    #[error("{0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    pub fn client_request(message: impl Into<String>) -> Self {
        Self::ClientRequest(message.into())
    }

    pub fn response(body: &serde_json::Value, status: u16) -> Self {
        Self::Response(format!("Error: {} Code: {}", body, status))
    }

    pub fn unexpected_response(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    /// The context message without the provider prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ClientRequest(message)
            | Self::Response(message)
            | Self::UnexpectedResponse(message) => message,
        }
    }

    /// Status an HTTP front end should answer with. None of these are the end user's fault.
    pub fn http_status(&self) -> u16 {
        500
    }
}

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    RemoteService,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Client(ClientError::ClientRequest(_)) => ErrorCategory::Network,
            Self::Client(_) => ErrorCategory::RemoteService,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::CsvError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::RemoteService => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Client(ClientError::ClientRequest(_)) => {
                format!("Could not reach {}. Check your network connection.", PROVIDER_NAME)
            }
            Self::Client(ClientError::Response(message)) => {
                format!("{} rejected the request ({})", PROVIDER_NAME, message)
            }
            Self::Client(ClientError::UnexpectedResponse(message)) => {
                format!("{} returned an unexpected response: {}", PROVIDER_NAME, message)
            }
            Self::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Client(ClientError::ClientRequest(_)) => {
                "Retry later; if it keeps failing check DNS, proxy and TLS settings"
            }
            Self::Client(ClientError::Response(_)) => {
                "Check the API token and your StormGlass quota, then retry"
            }
            Self::Client(ClientError::UnexpectedResponse(_)) => {
                "Report the response payload; retrying will likely not help"
            }
            Self::MissingConfigError { .. } => {
                "Set STORMGLASS_API_TOKEN or pass --api-token / api_token in the config file"
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Fix the configuration value and run again",
            Self::IoError(_) => "Check that the output path exists and is writable",
            Self::SerializationError(_) | Self::CsvError(_) | Self::ProcessingError { .. } => {
                "Run again with --verbose and report the log"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_request_message() {
        let err = ClientError::client_request("getaddrinfo ENOTFOUND api.stormglass.io");
        assert_eq!(
            err.to_string(),
            "Unexpected error when trying to communicate to StormGlass: getaddrinfo ENOTFOUND api.stormglass.io"
        );
        assert_eq!(err.message(), "getaddrinfo ENOTFOUND api.stormglass.io");
    }

    #[test]
    fn test_response_message() {
        let body = serde_json::json!({"errors": ["Rate limit reached"]});
        let err = ClientError::response(&body, 429);
        assert_eq!(
            err.to_string(),
            r#"Unexpected error returned by the StormGlass service: Error: {"errors":["Rate limit reached"]} Code: 429"#
        );
    }

    #[test]
    fn test_unexpected_response_keeps_caller_message() {
        let err = ClientError::unexpected_response("hours is empty");
        assert_eq!(err.to_string(), "hours is empty");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_forecast_error_classification() {
        let network: ForecastError = ClientError::client_request("timeout").into();
        assert_eq!(network.category(), ErrorCategory::Network);
        assert_eq!(network.severity(), ErrorSeverity::Medium);

        let remote: ForecastError = ClientError::response(&serde_json::json!("down"), 503).into();
        assert_eq!(remote.category(), ErrorCategory::RemoteService);
        assert!(remote.user_friendly_message().contains("Code: 503"));

        let missing = ForecastError::MissingConfigError {
            field: "api_token".to_string(),
        };
        assert_eq!(missing.severity(), ErrorSeverity::Critical);
        assert!(missing.recovery_suggestion().contains("STORMGLASS_API_TOKEN"));
    }
}
