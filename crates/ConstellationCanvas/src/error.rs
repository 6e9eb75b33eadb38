//! # Errors
//!
//! Runtime conditions (duplicate links, missing geometry, a surface that went
//! away mid-teardown) never surface here; they degrade to no-ops. `CanvasError`
//! is reserved for caller bugs such as a nonsensical viewport or config.

use thiserror::Error;

/// Contract violations raised by the public API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    /// The viewport must be finite and non-negative in both dimensions.
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    /// `zoom_min` must be positive and not greater than `zoom_max`.
    #[error("invalid zoom range [{min}, {max}]")]
    InvalidZoomRange { min: f32, max: f32 },
    /// Any other configuration value outside its domain.
    #[error("invalid canvas config: {0}")]
    InvalidConfig(String),
}
