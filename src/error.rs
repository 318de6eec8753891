/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Whether the error came from talking to the recommendation backend
    /// (transport failure, non-success status or an unreadable body).
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::MalformedResponse(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
