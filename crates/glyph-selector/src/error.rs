//! Error types for font loading.
//!
//! Lookups never fail: a missing font is `None`, a missing glyph is
//! [`Glyph::invalid`](crate::Glyph::invalid). Errors only come out of the
//! act of producing a font, which is why this module is small.

use thiserror::Error;

/// Errors that can occur while loading or generating a font.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontLoadError {
    /// An I/O error occurred while reading font data.
    #[error("I/O error: {0}")]
    Io(String),

    /// The font data is not a valid or supported font format.
    #[error("invalid font format: {0}")]
    InvalidFormat(String),

    /// The face a generator refers to is no longer available.
    #[error("font face not found: {0}")]
    MissingFace(String),

    /// A user-supplied generator failed for its own reasons.
    #[error("font generator failed: {0}")]
    Generator(String),
}

/// Result type for font loading operations.
pub type FontLoadResult<T> = Result<T, FontLoadError>;
