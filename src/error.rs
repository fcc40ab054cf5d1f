//! Error types shared across the crate
//!
//! Every fallible operation returns [`Result`] with the [`Error`] enum so
//! callers can match on the failure class instead of parsing strings.
//! Setters on scene objects are infallible and stay plain methods.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes for asset loading, shader handling and rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input data (OBJ syntax, bad shader source structure).
    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },

    /// Image data could not be encoded for writing.
    #[error("failed to encode {path}: {detail}")]
    Encode { path: String, detail: String },

    /// Shader source was readable but did not compile or validate.
    #[error("shader '{label}' failed to compile:\n{diagnostics}")]
    Compile { label: String, diagnostics: String },

    /// A named file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Underlying I/O failure other than a missing file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation invoked on an object that is not ready for it, such as
    /// rendering a scene with no camera.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Maps an I/O error to [`Error::FileNotFound`] when the file is missing,
    /// keeping the offending path in the message.
    pub(crate) fn from_io(err: std::io::Error, path: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_string())
        } else {
            Error::Io(err)
        }
    }
}
