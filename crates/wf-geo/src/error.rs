//! Geography-subsystem error type.

use thiserror::Error;

/// Errors produced by `wf-geo`.
///
/// Only document loading can fail; everything downstream of a loaded
/// [`crate::GeographyData`] is total.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(String),
}

pub type GeoResult<T> = Result<T, GeoError>;
