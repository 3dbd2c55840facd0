//! Simulation state resources and runtime lifecycle.
//!
//! The original design kept a process-wide "active simulation" singleton;
//! here the lifecycle is an explicit state machine owned by
//! [`SimulationRuntime`](crate::api::SimulationRuntime). Exactly one
//! simulation is live at a time: creating a new one first tears down the old
//! double buffer and its backing storage.

use bevy_ecs::prelude::*;

use crate::double_buffer::DoubleBuffer;
use crate::grid::{BitGrid, ChunkGrid};

/// Lifecycle of the runtime.
///
/// `TearingDown` is transient inside a teardown: no tick may run while the
/// old buffers are being released, and a reset never leaves partial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// No simulation exists; stepping is a no-op.
    Empty,
    /// A simulation is live and may be ticked.
    Active,
    /// The old buffers are being released.
    TearingDown,
}

/// Marker resource present while exactly one simulation is live.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ActiveSimulation;

/// Double-buffered flat grid state.
#[derive(Resource, Debug)]
pub struct FlatSimulation {
    pub buffers: DoubleBuffer<BitGrid>,
}

/// Double-buffered chunk grid state.
#[derive(Resource, Debug)]
pub struct ChunkedSimulation {
    pub buffers: DoubleBuffer<ChunkGrid>,
}
