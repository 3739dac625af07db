use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media item not found: {0}")]
    RecordNotFound(RecordId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Validation failed: {}", format_validation(.0))]
    Validation(Vec<(String, String)>),

    #[error("Invalid view: {0}")]
    InvalidView(String),

    #[error("Api Error: {0}")]
    Api(String),
}

fn format_validation(errors: &[(String, String)]) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, MediaError>;
