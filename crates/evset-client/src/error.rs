/// Errors returned by [`EventSettingsClient`](crate::EventSettingsClient).
///
/// # Examples
///
/// ```rust
/// use evset_client::error::ClientError;
///
/// let err = ClientError::Status {
///     method: "PATCH",
///     path: "/event-settings/7".to_string(),
///     status: 404,
///     message: "event setting 7 not found".to_string(),
/// };
/// assert!(err.to_string().contains("404"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client configuration is missing a required field or is invalid.
    #[error("Client: invalid configuration: {0}")]
    InvalidConfig(String),

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Client: HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Client: {method} {path} returned HTTP {status}: {message}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        message: String,
    },

    /// JSON serialization or deserialization failure.
    #[error("Client: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A 2xx response whose body does not have the expected shape.
    #[error("Client: invalid response: {0}")]
    InvalidResponse(String),

    /// Reading the configuration file failed.
    #[error("Client: failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("Client: invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
