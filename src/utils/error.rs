use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Snapshot not found: {path}")]
    SnapshotMissing { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl InspectorError {
    /// 只有快照缺失是可辨識的錯誤，其餘一律視為致命錯誤
    pub fn exit_code(&self) -> i32 {
        match self {
            InspectorError::SnapshotMissing { .. } => 2,
            _ => 1,
        }
    }

    pub fn is_snapshot_missing(&self) -> bool {
        matches!(self, InspectorError::SnapshotMissing { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InspectorError::SnapshotMissing { path } => {
                format!("{} not found in project root.", path)
            }
            InspectorError::ParseError { message } => {
                format!("Could not parse snapshot: {}", message)
            }
            InspectorError::ConfigError { message } => {
                format!("Configuration problem: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectorError>;
