use thiserror::Error;

/// Error type shared by the schedule core, configuration, and shell.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
