use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed WAV data: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("failed to parse results JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown question id: {0}")]
    UnknownQuestion(u32),

    #[error("already at the last question")]
    AtLastQuestion,

    #[error("already at the first question")]
    AtFirstQuestion,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("exporter not found: {0}")]
    NotFound(String),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
