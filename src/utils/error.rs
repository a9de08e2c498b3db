use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status}")]
    Api { status: u16, body: String },

    #[error("Malformed success body: {source}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

pub type Result<T> = std::result::Result<T, RateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Response,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RateError::Transport(_) => ErrorCategory::Network,
            RateError::Api { .. } => ErrorCategory::Api,
            RateError::ResponseParse { .. } => ErrorCategory::Response,
            RateError::Config { .. }
            | RateError::ConfigValidation { .. }
            | RateError::InvalidConfigValue { .. }
            | RateError::MissingConfig { .. } => ErrorCategory::Configuration,
            RateError::Serialization(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 遠端暫時性錯誤，重新執行可能成功
            RateError::Transport(_) => ErrorSeverity::Medium,
            RateError::Api { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            RateError::Api { .. } | RateError::ResponseParse { .. } => ErrorSeverity::High,
            RateError::Config { .. }
            | RateError::ConfigValidation { .. }
            | RateError::InvalidConfigValue { .. }
            | RateError::MissingConfig { .. } => ErrorSeverity::High,
            RateError::Serialization(_) => ErrorSeverity::Critical,
        }
    }

    /// 行程結束碼，每個錯誤類別各自獨立
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Api => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Response => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 5,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RateError::Transport(e) if e.is_timeout())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RateError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 原始回應內容（API 錯誤或無法解析的成功回應）
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            RateError::Api { body, .. } | RateError::ResponseParse { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RateError::Transport(e) if e.is_timeout() => {
                "The rate service did not answer before the configured timeout".to_string()
            }
            RateError::Transport(e) if e.is_connect() => {
                "Could not connect to the rate service".to_string()
            }
            RateError::Transport(_) => "The request to the rate service failed".to_string(),
            RateError::Api { status, .. } => {
                format!("The rate service rejected the request (HTTP {})", status)
            }
            RateError::ResponseParse { .. } => {
                "The rate service answered 200 but the body is not valid JSON".to_string()
            }
            RateError::Serialization(_) => "Could not serialize the rate request".to_string(),
            RateError::Config { message } => format!("Configuration problem: {}", message),
            RateError::ConfigValidation { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            RateError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid '{}': {}", field, reason)
            }
            RateError::MissingConfig { field } => format!("'{}' is not configured", field),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RateError::Transport(e) if e.is_timeout() => {
                "Raise timeout_seconds or check the service status".to_string()
            }
            RateError::Transport(_) => {
                "Check network connectivity and the configured endpoint".to_string()
            }
            RateError::Api { status: 401, .. } | RateError::Api { status: 403, .. } => {
                "The bearer token is invalid or expired; obtain a new one".to_string()
            }
            RateError::Api { status, .. } if *status >= 500 => {
                "The rate service is failing; try again later".to_string()
            }
            RateError::Api { .. } => {
                "Inspect the error body and correct the shipment details".to_string()
            }
            RateError::ResponseParse { .. } => {
                "Verify the endpoint points at the rating API and not a proxy or login page"
                    .to_string()
            }
            RateError::Serialization(_) => {
                "Check the shipment values in the config file".to_string()
            }
            RateError::MissingConfig { field } if field == "api.token" => {
                "Set RATE_QUOTE_TOKEN or pass --token".to_string()
            }
            RateError::MissingConfig { field } if field == "api.endpoint" => {
                "Set RATE_QUOTE_ENDPOINT, pass --endpoint, or add api.endpoint to the config file"
                    .to_string()
            }
            RateError::Config { .. }
            | RateError::ConfigValidation { .. }
            | RateError::InvalidConfigValue { .. }
            | RateError::MissingConfig { .. } => "Fix the configuration and run again".to_string(),
        }
    }
}
