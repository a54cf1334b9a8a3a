use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage holds invalid data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("No Tokio runtime available to schedule the expiry timer")]
    NoRuntime,

    #[error("Not authenticated")]
    NotAuthenticated,
}
