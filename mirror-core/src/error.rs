use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("archive path {path} does not start with root {root}")]
    InvalidPath { path: String, root: String },

    #[error("no file descriptor labelled {label:?} on resource parent")]
    MissingDescriptor { label: String },

    #[error("server path {path} is not under resource root {root}")]
    OutsideRoot { path: String, root: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unsafe archive entry: {0}")]
    UnsafeEntry(String),

    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown file: {0}")]
    UnknownFile(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, MirrorError>;
