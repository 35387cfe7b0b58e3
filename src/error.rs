use thiserror::Error;

/// Errors surfaced by the UPI workflows and their storage backends.
///
/// Domain failures are distinct variants so the request layer can map each one
/// to its own response. Anything the persistence layer cannot classify ends up
/// in [`PaymentError::Storage`].
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },
    #[error("no VPA found for user")]
    NoVpa,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PaymentError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(Box::new(std::io::Error::other(message.into())))
    }

    /// Stable machine-readable kind, used in response envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidAmount => "invalid_amount",
            Self::AlreadyExists { .. } => "already_exists",
            Self::NoVpa => "no_vpa",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "invalid_request",
            Self::Storage(_) => "storage_failure",
        }
    }
}

impl From<std::io::Error> for PaymentError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
