use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("config directory not found")]
    NoConfigDir,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("sign in first")]
    NotAuthenticated,
}
