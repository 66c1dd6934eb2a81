use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content not found in pending: {service}/{town}")]
    NotPending { service: String, town: String },

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotPending { .. })
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
