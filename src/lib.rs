//! Game of Life - Grid Simulation Core
//!
//! A bit-packed, double-buffered Conway's Game of Life engine for very large
//! grids (millions of cells) at interactive rates. Uses `bevy_ecs` for the
//! resource/system architecture; rendering, camera, and input live in
//! external clients that consume the grid through the accessor API.

pub mod api;
pub mod config;
pub mod double_buffer;
pub mod error;
pub mod grid;
pub mod profiler;
pub mod state;
pub mod stats;
pub mod systems;

pub use api::SimulationRuntime;
pub use config::{GridRepresentation, SimConfig};
pub use double_buffer::DoubleBuffer;
pub use error::SimError;
pub use grid::{BitGrid, CellGrid, ChunkGrid};
pub use state::RuntimeState;
pub use stats::{format_bytes, SimStats};
