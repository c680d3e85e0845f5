use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookgenError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Session {0} is not ready for download")]
    NotReady(String),

    #[error("BookgenError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for BookgenError {
    fn from(error: std::io::Error) -> Self {
        BookgenError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for BookgenError {
    fn from(error: reqwest::Error) -> Self {
        BookgenError::Reqwest(Box::new(error))
    }
}
