use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // State file errors
    #[error("Seen-set persistence failed: {0}")]
    Persistence(String),

    // Notification errors
    #[error("Delivery failed: {0}")]
    Delivery(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mailer::MailError> for ScoutError {
    fn from(err: mailer::MailError) -> Self {
        ScoutError::Delivery(err.to_string())
    }
}

pub type ScoutResult<T> = Result<T, ScoutError>;
