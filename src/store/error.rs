use crate::models::Collection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },
    #[error("{0}")]
    Validation(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: &str) -> Self {
        StoreError::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Short prefix used when the error crosses the command boundary.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::Validation(_) => "VALIDATION",
            StoreError::UnknownCollection(_) => "UNKNOWN_COLLECTION",
            StoreError::Sqlite(_) => "DB_ERROR",
            StoreError::Json(_) => "JSON_ERROR",
            StoreError::Csv(_) | StoreError::Io(_) => "IO_ERROR",
        }
    }
}
