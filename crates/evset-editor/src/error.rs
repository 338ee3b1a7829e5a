/// Errors surfaced by the [`SyncController`](crate::sync::SyncController).
///
/// Local validation problems are not errors here; they are reported per row
/// through [`ValidationReport`](crate::validation::ValidationReport).
///
/// # Examples
///
/// ```rust
/// use evset_editor::error::SyncError;
///
/// let err = SyncError::Api {
///     operation: "create",
///     message: "HTTP 500".to_string(),
/// };
/// assert!(err.to_string().contains("create"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A call to the event-settings API failed. `message` is what the
    /// editor shows as its api error.
    #[error("Sync: {operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },
}

impl SyncError {
    pub(crate) fn api(operation: &'static str, err: &anyhow::Error) -> Self {
        SyncError::Api {
            operation,
            message: format!("{err:#}"),
        }
    }

    /// The text stored as the editor's api error.
    pub fn message(&self) -> &str {
        match self {
            SyncError::Api { message, .. } => message,
        }
    }
}

/// Convenience `Result` alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
