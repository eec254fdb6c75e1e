use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridGpError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Genotype error: {0}")]
    Genotype(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GridGpError>;
