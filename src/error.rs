use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workspace root unavailable: {0}")]
    WorkspaceRoot(String),

    #[error("No component could be indexed: {0} definition files failed to read")]
    EmptyIndex(usize),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, NavigatorError>;
