//! Error types for grid construction and configuration.
//!
//! All errors are detected at reset/construction time, before any tick runs.
//! A failed construction is fatal to that reset attempt; the caller must not
//! schedule ticks against a runtime whose reset returned an error. There is
//! no mid-tick recovery path.

use std::fmt;

/// Errors raised while validating a configuration or allocating a grid.
///
/// Each variant carries enough context to produce a single diagnostic that
/// names the violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The grid axis size is zero.
    ZeroAxisSize,
    /// The chunked representation requires the axis size to be a multiple
    /// of the chunk dimensions (8 wide, 4 tall, enforced as 32).
    AxisNotChunkAligned { axis_size: u32 },
    /// The update rate must be strictly positive.
    InvalidUpdateRate { updates_per_second: f32 },
    /// An explicit initial cell lies outside `[0, axis_size)`.
    CellOutOfBounds { x: u32, y: u32, axis_size: u32 },
    /// The total cell count does not divide evenly into 32-bit packing words.
    CellCountNotPackable { cell_count: u64 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ZeroAxisSize => {
                write!(f, "grid axis size must be greater than zero")
            }
            SimError::AxisNotChunkAligned { axis_size } => {
                write!(
                    f,
                    "grid axis size {} is not a multiple of 32 (required by the chunked representation)",
                    axis_size
                )
            }
            SimError::InvalidUpdateRate { updates_per_second } => {
                write!(
                    f,
                    "updates per second must be greater than zero (got {})",
                    updates_per_second
                )
            }
            SimError::CellOutOfBounds { x, y, axis_size } => {
                write!(
                    f,
                    "initial alive cell ({}, {}) lies outside the grid (axis size {})",
                    x, y, axis_size
                )
            }
            SimError::CellCountNotPackable { cell_count } => {
                write!(
                    f,
                    "total cell count {} is not divisible by the 32-bit packing unit",
                    cell_count
                )
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_name_the_violated_constraint() {
        let err = SimError::AxisNotChunkAligned { axis_size: 33 };
        assert!(err.to_string().contains("33"));
        assert!(err.to_string().contains("multiple of 32"));

        let err = SimError::CellOutOfBounds { x: 7, y: 99, axis_size: 64 };
        assert!(err.to_string().contains("(7, 99)"));
        assert!(err.to_string().contains("64"));
    }
}
