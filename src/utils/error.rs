use thiserror::Error;

/// 使用者看到的資料來源錯誤前綴
pub const SOURCE_HINT: &str = "Please check the data source is correct";

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("{hint}: {source}", hint = SOURCE_HINT)]
    SourceUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("{hint}: line {line}: {reason}", hint = SOURCE_HINT)]
    MalformedRecord { line: u64, reason: String },

    #[error("Console error: {0}")]
    ConsoleError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Data,
    Console,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        ShopError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ShopError::SourceUnavailable { .. } => ErrorCategory::Source,
            ShopError::MalformedRecord { .. } => ErrorCategory::Data,
            ShopError::ConsoleError(_) | ShopError::SerializationError(_) => {
                ErrorCategory::Console
            }
            ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Source | ErrorCategory::Console => ErrorSeverity::Critical,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    /// 根據嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::ConsoleError(e) => format!("Lost the console: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ShopError::SourceUnavailable { .. } => {
                "Make sure the inventory file exists and is readable"
            }
            ShopError::MalformedRecord { .. } => {
                "Fix the line so it reads name,£price or rerun with --on-malformed-line skip"
            }
            ShopError::ConsoleError(_) | ShopError::SerializationError(_) => {
                "Check that stdin and stdout are still attached"
            }
            ShopError::ConfigValidationError { .. }
            | ShopError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML settings file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
