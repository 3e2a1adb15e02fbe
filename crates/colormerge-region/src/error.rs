//! Error types for colormerge-region

use thiserror::Error;

/// Errors that can occur during region merging
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] colormerge_core::Error),

    /// Target region count below the minimum of 2
    #[error("invalid target region count {target}: must be at least 2")]
    InvalidTarget { target: u32 },

    /// Pixel or region id outside the store
    #[error("id {id} out of range (len {len})")]
    OutOfRange { id: usize, len: usize },

    /// Union requested on an id that has already been absorbed
    #[error("id {id} is not a region root")]
    NotARoot { id: usize },

    /// Union of a region with itself
    #[error("cannot merge region {id} with itself")]
    SelfUnion { id: usize },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
