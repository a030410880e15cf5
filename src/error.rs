//! Error taxonomy shared by the grid, store and sync layers

use thiserror::Error;

/// Errors surfaced by the annotation core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A malformed identifier reached a geometry lookup
    #[error("invalid cell id {0:?}")]
    InvalidCellId(String),
    /// A point that cannot be placed on the grid (non-finite or out of range)
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    /// A viewport whose bounds cannot be turned into a polygon
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),
    /// The remote operation completed but reported a business-level failure
    #[error("remote operation failed: {0}")]
    Domain(String),
    /// Network, protocol or decoding failure
    #[error("transport failure: {0}")]
    Transport(String),
}

impl Error {
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
