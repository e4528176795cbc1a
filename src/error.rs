/// Error types for the capture workflow
///
/// Every failure the core can produce is a variant here. The front-end turns
/// them into status messages; nothing in this crate aborts on them.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// Identifier is already registered, or was blank
    #[error("mouse '{0}' already exists or the input is empty")]
    Duplicate(String),

    /// Identifier is not in the registry
    #[error("mouse '{0}' is not registered")]
    NotFound(String),

    /// Identifier cannot be stored as a line or used as a folder name
    #[error("'{0}' cannot be used as a mouse number")]
    InvalidIdentifier(String),

    /// Uploaded bytes are not an image we can read
    #[error("could not read the uploaded photo: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode the photo as JPEG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
