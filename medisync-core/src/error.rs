/// Failures reading or writing durable key-value storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store is missing (no window, storage disabled, quota policy).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write.
    #[error("storage write failed for key '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Failures surfaced by the session service. The `Display` text is what the
/// error banner shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("No account found with that email address")]
    UnknownEmail,

    #[error("You must be signed in to do that")]
    NotAuthenticated,

    #[error("Invalid or missing reset token")]
    MissingToken,

    #[error("Password is required")]
    EmptyPassword,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of page-local record mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record {0} not found")]
    NotFound(u32),
}
