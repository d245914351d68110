use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("IO Error: {0}")]
    IoError(String),

    #[error("File read failed for {0}: {1}")]
    FileReadError(String, String),

    #[error("File write failed for {0}: {1}")]
    FileWriteError(String, String),

    #[error("YAML Error: {0}")]
    YamlError(String),

    #[error("Regex Error: {0}")]
    RegexError(String),

    #[error("Pattern Error: {0}")]
    PatternError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Inventory error: {0}")]
    InventoryError(String),

    #[error("CSV error: {0}")]
    CsvError(String),

    #[error("Keyword threshold exceeded: {0}")]
    ThresholdExceeded(String),
}

impl From<std::io::Error> for ToolkitError {
    fn from(err: std::io::Error) -> Self {
        ToolkitError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ToolkitError {
    fn from(err: serde_yaml::Error) -> Self {
        ToolkitError::YamlError(err.to_string())
    }
}

impl From<regex::Error> for ToolkitError {
    fn from(err: regex::Error) -> Self {
        ToolkitError::RegexError(err.to_string())
    }
}

impl From<glob::PatternError> for ToolkitError {
    fn from(err: glob::PatternError) -> Self {
        ToolkitError::PatternError(err.to_string())
    }
}
