use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("read event payload {path}: {message}")]
    Read { path: String, message: String },

    #[error("decode event payload: {0}")]
    Decode(String),

    #[error("invalid repository {0:?}, expected owner/repo")]
    InvalidRepository(String),

    #[error("missing {0} in event payload")]
    Missing(&'static str),
}
