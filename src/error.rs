use thiserror::Error;

#[derive(Error, Debug)]
pub enum AqlcladError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid request: {0}")]
    Request(#[from] http::Error),
    #[error("Malformed predicate: {message}")]
    MalformedPredicate { message: String },
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
    #[error("Invalid cursor transition: {0}")]
    InvalidCursor(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, AqlcladError>;

// Helper conversions
impl From<config::ConfigError> for AqlcladError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for AqlcladError {
    fn from(e: serde_json::Error) -> Self { Self::MalformedResponse { message: e.to_string() } }
}
