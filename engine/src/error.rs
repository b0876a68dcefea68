//! Error types for surface operations.

use thiserror::Error;

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Failures a surface can report. None of them are fatal to the board; the
/// surface manager recovers from each one by falling back to a blank surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A snapshot taken at one device pixel ratio cannot be restored at another
    /// without breaking the logical-to-device mapping.
    #[error("snapshot scale {snapshot} does not match surface scale {surface}")]
    ScaleMismatch { snapshot: f64, surface: f64 },

    /// The snapshot's pixel buffer does not match its declared dimensions.
    #[error("snapshot buffer holds {len} bytes, expected {expected}")]
    SnapshotSize { len: usize, expected: usize },

    /// The backing store could not be allocated at the requested size.
    #[error("failed to allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    /// The platform drawing backend rejected a call.
    #[error("surface backend error: {0}")]
    Backend(String),
}
