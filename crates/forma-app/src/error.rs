use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Message surfaced by the backend in an error body
    #[error("backend error: {0}")]
    Backend(String),

    /// 401 from any endpoint. Routed to session-expiry handling rather
    /// than an error banner.
    #[error("session expired")]
    Unauthorized,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unsupported image format: {0}")]
    Image(String),

    #[error("extraction error: {0}")]
    Extract(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
