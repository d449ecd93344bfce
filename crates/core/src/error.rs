#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(std::io::Error),
    #[error("identifier synchronisation did not settle after {passes} passes")]
    SyncDidNotSettle { passes: usize },
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;
