use thiserror::Error;

#[derive(Error, Debug)]
pub enum DartsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unknown game variant '{0}'")]
    UnknownVariant(String),

    /// Rejected by the store (unique name, dangling parent, ...). Nothing was written.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Session Error: {0}")]
    Session(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A variant is missing logic the engine needs. Not recoverable at runtime.
    #[error("Variant '{variant}' does not implement `{method}`")]
    Contract {
        variant: String,
        method: &'static str,
    },
}

impl DartsError {
    pub fn is_constraint(&self) -> bool {
        matches!(self, DartsError::Constraint(_))
    }
}

pub type DartsResult<T> = Result<T, DartsError>;
