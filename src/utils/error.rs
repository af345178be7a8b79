use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Upstream {url} returned status {status}: {body}")]
    UpstreamError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Token acquisition failed: {message}")]
    TokenError { message: String },

    #[error("Unparseable time string: {value:?}")]
    TimeParseError { value: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid config value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, BoardError>;
