//! ECS systems driving the simulation.
//!
//! Exactly one tick system is scheduled per run, matching the selected grid
//! representation:
//!
//! - `life::flat_life_system` - ticks a `FlatSimulation` (BitGrid pair)
//! - `life::chunked_life_system` - ticks a `ChunkedSimulation` (ChunkGrid pair)
//!
//! Both are gated by the fixed-rate `UpdateTimer` and end the tick with a
//! buffer swap. `init` holds the one-shot initializers that populate the
//! primary grid before the first tick.

pub mod init;
pub mod life;

pub use init::{apply_initial_cells, randomize_bit_grid, randomize_chunk_grid};
pub use life::{
    chunked_life_system, flat_life_system, next_cell_state, step_bit_grid, step_chunk_grid,
    DeltaTime, SimTick, UpdateTimer,
};
