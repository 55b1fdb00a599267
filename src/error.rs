use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("cannot splice attribute: {0}")]
    Splice(String),
}
