use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{entity} with UID or name '{identifier}' not found")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid key format")]
    InvalidKeyFormat,

    #[error("key expired")]
    KeyExpired,
}

impl Error {
    pub fn not_found(entity: &'static str, identifier: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            identifier: identifier.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
