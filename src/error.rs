use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoldError {
    #[error("Cannot decode '{0}' as a move, expected 'l', 'r' or 's'")]
    Decode(char),

    #[error("Payload length {length} is not a multiple of the genome width {width}")]
    ProtocolLength { length: usize, width: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, FoldError>;
