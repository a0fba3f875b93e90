//! Error types for the dashboard exporter

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting data or exporting the dashboard
#[derive(Error, Debug)]
pub enum Error {
    /// The container holding the printable sections does not exist
    #[error("Capture target is not available")]
    MissingCaptureTarget,

    /// The capture target exists but holds no printable sections
    #[error("No printable sections found")]
    NoSections,

    /// Failed to capture a rendered section as a raster image
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Network error talking to the data source
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The data source answered without a usable `totalResults`
    #[error("Malformed response for category '{category}': {detail}")]
    MalformedResponse { category: String, detail: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to assemble or serialise the PDF document
    #[error("PDF error: {0}")]
    PdfError(String),

    /// Failed to decode or encode image data
    #[error("Image error: {0}")]
    ImageError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageError(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfError(err.to_string())
    }
}
