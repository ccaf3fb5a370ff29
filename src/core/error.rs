use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteplanError {
    #[error("Plot has no boundary geometry")]
    MissingBoundary,

    #[error("No scenario batch awaiting selection")]
    NoPendingBatch,

    #[error("Scenario index out of range: {0}")]
    ScenarioOutOfRange(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SiteplanError>;
