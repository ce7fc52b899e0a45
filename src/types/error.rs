use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("funko {id} not found in collection of {owner}")]
    NotFound { owner: String, id: u32 },
    #[error("owner {0} not found")]
    OwnerNotFound(String),
    #[error("funko {id} already exists in collection of {owner}")]
    AlreadyExists { owner: String, id: u32 },
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Connection(#[from] rusqlite::Error),
}

impl StoreError {
    /// Stable machine-readable code carried in the response envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::OwnerNotFound(_) => "OWNER_NOT_FOUND",
            StoreError::AlreadyExists { .. } => "ALREADY_EXISTS",
            StoreError::Validation(_) => "VALIDATION",
            StoreError::Io(_) => "IO",
            StoreError::Connection(_) => "CONNECTION",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
