/// Error types shared by the backend client, the stores and configuration
///
/// All of these are `Clone` so they can ride inside iced messages.

use thiserror::Error;

/// Failure talking to the product backend
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (or its body could not be read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("server responded with status {status}")]
    Server { status: u16 },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Server {
                status: status.as_u16(),
            },
            None => ApiError::Transport(err.to_string()),
        }
    }
}

/// Local precondition failures. These never reach the network.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields + Image required")]
    MissingFields,

    #[error("Price must be a non-negative number")]
    InvalidPrice,

    #[error("Image must be less than 5MB")]
    ImageTooLarge,

    #[error("Select a valid image")]
    InvalidImageType,

    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
