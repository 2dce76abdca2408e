use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot fit a vectorizer on an empty route corpus")]
    EmptyCorpus,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No similarity model loaded: {0}")]
    UnknownModel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Short machine-readable name used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyCorpus => "EmptyCorpus",
            Error::InvalidQuery(_) => "InvalidQuery",
            Error::UnknownModel(_) => "UnknownModel",
            Error::InvalidConfig(_) => "InvalidConfig",
            Error::NotFound(_) => "NotFound",
            Error::Operation(_) => "Operation",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
