use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("No active session: start one before querying or issuing commands")]
    SessionNotStarted,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
