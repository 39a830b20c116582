//! Error type shared by the leafscan library.
//!
//! Only two failures are ever shown to the user as part of normal operation:
//! a missing gallery example and an unusable upload. Model failures surface
//! as `Model`/`Inference` and end the current request.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The request carried no image bytes at all.
    #[error("no image data was provided")]
    EmptyInput,

    /// The payload is an image, but not one of the accepted formats.
    #[error("unsupported image format: {0} (expected JPG, JPEG or PNG)")]
    UnsupportedFormat(String),

    /// The payload claims to be JPEG/PNG but could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("model error: {0}")]
    Model(String),

    #[error("inference error: {0}")]
    Inference(String),

    /// The model produced a vector that does not line up with the label set.
    #[error("unexpected model output: expected {expected} values, got {got}")]
    OutputShape { expected: usize, got: usize },

    #[error("example image not found: {0}")]
    ExampleNotFound(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ort::Error> for Error {
    fn from(e: ort::Error) -> Self {
        tracing::error!(error = %e, "onnx runtime error");
        Error::Inference(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(u) => Error::UnsupportedFormat(u.to_string()),
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Decode(other.to_string()),
        }
    }
}

/// Convenience Result type for leafscan operations.
pub type Result<T> = std::result::Result<T, Error>;
