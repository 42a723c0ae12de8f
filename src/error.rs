//! Error types for encoding, option documents and rendering.

use crate::symbol::Symbology;

/// Result type alias for barcode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host.
///
/// Geometry and text layout never fail; only encoding, option parsing and the final
/// interaction with a drawing surface do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The encoder rejected the message.
    #[error("{symbology} encoding failed: {reason}")]
    Encode {
        /// Symbology that was being encoded
        symbology: Symbology,
        /// Reason reported by the encoder
        reason: String,
    },

    /// A drawing primitive failed part way through a render.
    #[error("error rendering barcode")]
    Render {
        /// Failure reported by the surface
        #[source]
        source: SurfaceError,
    },

    /// Malformed display option document.
    #[error("invalid display options: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Build an encoding error.
    pub fn encode(symbology: Symbology, reason: impl Into<String>) -> Self {
        Error::Encode {
            symbology,
            reason: reason.into(),
        }
    }
}

impl From<SurfaceError> for Error {
    fn from(source: SurfaceError) -> Self {
        Error::Render { source }
    }
}

/// Failure of a single drawing-surface primitive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("surface error: {message}")]
pub struct SurfaceError {
    message: String,
}

impl SurfaceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
