/// Errors raised while building a field profile catalog.
///
/// # Examples
///
/// ```rust
/// use evset_common::error::ProfileError;
///
/// let err = ProfileError::DuplicateField("temperature".to_string());
/// assert!(err.to_string().contains("temperature"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The TOML document could not be parsed.
    #[error("Profiles: invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two profiles share the same field key.
    #[error("Profiles: duplicate field key '{0}'")]
    DuplicateField(String),

    /// A profile has an empty field key.
    #[error("Profiles: field key must not be empty")]
    EmptyKey,
}

/// Convenience `Result` alias for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
