//! Simulation configuration.
//!
//! The configuration is owned by the external client (UI, scene bootstrap)
//! and handed to the core once per reset. It is validated in full before any
//! grid is allocated, so a bad configuration can never leave a half-built
//! simulation behind.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Which grid representation backs the simulation.
///
/// `Flat` stores one bit per cell in a contiguous bit buffer; `Chunked`
/// packs 8x4-cell tiles into 32-bit words, which is the layout bulk GPU
/// uploads want. Both carry a one-unit always-dead ghost border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridRepresentation {
    Flat,
    Chunked,
}

impl Default for GridRepresentation {
    fn default() -> Self {
        Self::Flat
    }
}

/// Configuration for one simulation run.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Side length of the square grid, in cells.
    /// Must be a multiple of 32 when `grid_representation` is `Chunked`.
    pub grid_axis_size: u32,
    /// Target tick rate of the update kernel, in Hz.
    pub updates_per_second: f32,
    /// When true, the grid is seeded by the parallel random initializer;
    /// otherwise `initial_alive_cells` is applied.
    pub use_random_initialization: bool,
    /// Explicit live cells, each in `[0, grid_axis_size)` on both axes.
    /// Ignored when `use_random_initialization` is set.
    pub initial_alive_cells: Vec<(u32, u32)>,
    /// Selects the backing grid storage.
    pub grid_representation: GridRepresentation,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_axis_size: 256,
            updates_per_second: 10.0,
            use_random_initialization: true,
            initial_alive_cells: Vec::new(),
            grid_representation: GridRepresentation::Flat,
        }
    }
}

impl SimConfig {
    /// Check every constraint the core relies on.
    ///
    /// Called once at reset, before allocation. Returns the first violated
    /// constraint as a `SimError`.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.grid_axis_size == 0 {
            return Err(SimError::ZeroAxisSize);
        }
        if !(self.updates_per_second > 0.0) {
            return Err(SimError::InvalidUpdateRate {
                updates_per_second: self.updates_per_second,
            });
        }
        if self.grid_representation == GridRepresentation::Chunked
            && self.grid_axis_size % 32 != 0
        {
            return Err(SimError::AxisNotChunkAligned {
                axis_size: self.grid_axis_size,
            });
        }
        if !self.use_random_initialization {
            for &(x, y) in &self.initial_alive_cells {
                if x >= self.grid_axis_size || y >= self.grid_axis_size {
                    return Err(SimError::CellOutOfBounds {
                        x,
                        y,
                        axis_size: self.grid_axis_size,
                    });
                }
            }
        }
        Ok(())
    }

    /// Seconds between ticks (`1 / updates_per_second`).
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.updates_per_second
    }

    /// Parse a configuration from JSON.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Serialize this configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let config = SimConfig {
            grid_axis_size: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimError::ZeroAxisSize));
    }

    #[test]
    fn test_chunked_axis_must_be_multiple_of_32() {
        let config = SimConfig {
            grid_axis_size: 48,
            grid_representation: GridRepresentation::Chunked,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimError::AxisNotChunkAligned { axis_size: 48 })
        );

        let config = SimConfig {
            grid_axis_size: 64,
            grid_representation: GridRepresentation::Chunked,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_update_rate_must_be_positive() {
        let config = SimConfig {
            updates_per_second: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidUpdateRate { .. })
        ));
    }

    #[test]
    fn test_explicit_cells_must_be_in_range() {
        let config = SimConfig {
            grid_axis_size: 16,
            use_random_initialization: false,
            initial_alive_cells: vec![(3, 3), (16, 0)],
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimError::CellOutOfBounds { x: 16, y: 0, axis_size: 16 })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            grid_axis_size: 64,
            updates_per_second: 30.0,
            use_random_initialization: false,
            initial_alive_cells: vec![(1, 2)],
            grid_representation: GridRepresentation::Chunked,
        };
        let parsed = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.grid_axis_size, 64);
        assert_eq!(parsed.grid_representation, GridRepresentation::Chunked);
        assert_eq!(parsed.initial_alive_cells, vec![(1, 2)]);
    }
}
