//! Public API for the simulation core.
//!
//! This module provides the main interface for a renderer, UI, or any other
//! client to drive the simulation and read cell state.
//!
//! ## Lifecycle
//!
//! A [`SimulationRuntime`] starts `Empty`. `reset` validates the
//! configuration, tears down any previous simulation (old buffers are
//! released before new ones are allocated), allocates the double buffer for
//! the selected
//! grid representation, runs the initializer once, and becomes `Active`.
//!
//! ## Stepping
//!
//! `step(dt)` is synchronous: it accumulates wall-clock time and runs at
//! most one tick per call once the accumulator reaches the configured tick
//! interval. The tick fans out over worker threads internally (with the
//! `parallel` feature) and joins before `step` returns, so clients always
//! observe a fully written grid.

use bevy_ecs::prelude::*;

#[cfg(feature = "profile")]
use std::time::Instant;

use crate::config::{GridRepresentation, SimConfig};
use crate::double_buffer::DoubleBuffer;
use crate::error::SimError;
use crate::grid::{BitGrid, CellGrid, ChunkGrid};
#[cfg(feature = "profile")]
use crate::profiler::TickProfiler;
use crate::state::{ActiveSimulation, ChunkedSimulation, FlatSimulation, RuntimeState};
use crate::stats::SimStats;
use crate::systems::init::{apply_initial_cells, randomize_bit_grid, randomize_chunk_grid};
use crate::systems::life::{
    chunked_life_system, flat_life_system, DeltaTime, SimTick, UpdateTimer,
};

/// The simulation runtime: ECS world, tick schedule, and lifecycle state.
///
/// Owns at most one live simulation; resetting replaces it wholesale.
pub struct SimulationRuntime {
    world: World,
    schedule: Schedule,
    state: RuntimeState,
    #[cfg(feature = "profile")]
    profiler: TickProfiler,
}

impl SimulationRuntime {
    /// Create an empty runtime. No grids exist until the first `reset`.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            schedule: Schedule::default(),
            state: RuntimeState::Empty,
            #[cfg(feature = "profile")]
            profiler: TickProfiler::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RuntimeState {
        self.state
    }

    /// Whether a simulation is live.
    pub fn is_active(&self) -> bool {
        self.state == RuntimeState::Active
    }

    /// Start a fresh simulation from `config` with a randomly drawn master
    /// seed. Any previous simulation is torn down first.
    pub fn reset(&mut self, config: SimConfig) -> Result<u64, SimError> {
        let master_seed = rand::random();
        self.reset_seeded(config, master_seed)?;
        Ok(master_seed)
    }

    /// Start a fresh simulation from `config` with an explicit master seed.
    ///
    /// The random initializer is deterministic for a fixed master seed and a
    /// fixed worker count; rerunning with the same seed reproduces the same
    /// soup.
    pub fn reset_seeded(&mut self, config: SimConfig, master_seed: u64) -> Result<(), SimError> {
        self.teardown();
        config.validate()?;

        let axis_size = config.grid_axis_size;
        self.schedule = Schedule::default();
        match config.grid_representation {
            GridRepresentation::Flat => {
                let mut buffers = DoubleBuffer::<BitGrid>::allocate(axis_size)?;
                if config.use_random_initialization {
                    randomize_bit_grid(buffers.current_mut(), master_seed);
                } else {
                    apply_initial_cells(buffers.current_mut(), &config.initial_alive_cells);
                }
                self.world.insert_resource(FlatSimulation { buffers });
                self.schedule.add_systems(flat_life_system);
            }
            GridRepresentation::Chunked => {
                let mut buffers = DoubleBuffer::<ChunkGrid>::allocate(axis_size)?;
                if config.use_random_initialization {
                    randomize_chunk_grid(buffers.current_mut(), master_seed);
                } else {
                    apply_initial_cells(buffers.current_mut(), &config.initial_alive_cells);
                }
                self.world.insert_resource(ChunkedSimulation { buffers });
                self.schedule.add_systems(chunked_life_system);
            }
        }

        self.world
            .insert_resource(UpdateTimer::from_rate(config.updates_per_second));
        self.world.insert_resource(DeltaTime::default());
        self.world.insert_resource(SimTick::default());
        self.world.insert_resource(config);
        self.world.insert_resource(ActiveSimulation);
        self.state = RuntimeState::Active;
        Ok(())
    }

    /// Release the active simulation and its backing storage.
    ///
    /// No tick can run while teardown is in progress; the runtime ends up
    /// `Empty` and ignores `step` calls until the next `reset`.
    pub fn teardown(&mut self) {
        if self.state == RuntimeState::Empty {
            return;
        }
        self.state = RuntimeState::TearingDown;
        self.world.remove_resource::<ActiveSimulation>();
        self.world.remove_resource::<FlatSimulation>();
        self.world.remove_resource::<ChunkedSimulation>();
        self.world.remove_resource::<SimConfig>();
        self.world.remove_resource::<UpdateTimer>();
        self.world.remove_resource::<DeltaTime>();
        self.world.remove_resource::<SimTick>();
        self.schedule = Schedule::default();
        #[cfg(feature = "profile")]
        self.profiler.reset();
        self.state = RuntimeState::Empty;
    }

    /// Advance wall-clock time by `dt` seconds and run at most one tick.
    /// A no-op unless the runtime is `Active`.
    pub fn step(&mut self, dt: f32) {
        if self.state != RuntimeState::Active {
            return;
        }
        if let Some(mut delta) = self.world.get_resource_mut::<DeltaTime>() {
            delta.0 = dt;
        }

        #[cfg(feature = "profile")]
        let start = Instant::now();
        #[cfg(feature = "profile")]
        let tick_before = self.current_tick();

        self.schedule.run(&mut self.world);

        #[cfg(feature = "profile")]
        if self.current_tick() != tick_before {
            self.profiler.record_tick(start.elapsed());
        }
    }

    /// Ticks completed since the last reset.
    pub fn current_tick(&self) -> u64 {
        self.world
            .get_resource::<SimTick>()
            .map(|t| t.0)
            .unwrap_or(0)
    }

    /// Axis size of the active grid, if any.
    pub fn axis_size(&self) -> Option<u32> {
        self.world
            .get_resource::<SimConfig>()
            .map(|c| c.grid_axis_size)
    }

    /// Simulated cell count (`axis_size^2`) of the active grid, if any.
    pub fn cell_count(&self) -> Option<u64> {
        self.with_current_grid(|grid| grid.cell_count())
    }

    /// Read one cell of the active grid. Dead when no simulation is live.
    pub fn get_cell(&self, x: u32, y: u32) -> bool {
        self.with_current_grid(|grid| grid.get_cell(x as i32, y as i32))
            .unwrap_or(false)
    }

    /// Live cells in the active grid, if any.
    pub fn population(&self) -> Option<u64> {
        self.with_current_grid(|grid| grid.population())
    }

    /// Backing storage of both buffers in bytes, if any.
    pub fn memory_consumption(&self) -> Option<usize> {
        if let Some(sim) = self.world.get_resource::<FlatSimulation>() {
            return Some(sim.buffers.memory_consumption());
        }
        if let Some(sim) = self.world.get_resource::<ChunkedSimulation>() {
            return Some(sim.buffers.memory_consumption());
        }
        None
    }

    /// Interior chunk words of the active chunked grid, ghost border
    /// stripped. `None` for the flat representation; renderers read that
    /// one per cell via `get_cell`.
    pub fn chunk_interior_words(&self) -> Option<Vec<u32>> {
        let sim = self.world.get_resource::<ChunkedSimulation>()?;
        let mut words = Vec::new();
        sim.buffers.current().copy_interior_into(&mut words);
        Some(words)
    }

    /// Statistics snapshot of the active simulation, if any.
    pub fn stats(&self) -> Option<SimStats> {
        Some(SimStats {
            tick: self.current_tick(),
            axis_size: self.axis_size()?,
            cell_count: self.cell_count()?,
            population: self.population()?,
            memory_bytes: self.memory_consumption()?,
        })
    }

    /// Aggregated tick timings since the last reset.
    #[cfg(feature = "profile")]
    pub fn profiler(&self) -> &TickProfiler {
        &self.profiler
    }

    fn with_current_grid<R>(&self, f: impl FnOnce(&dyn CellGrid) -> R) -> Option<R> {
        if let Some(sim) = self.world.get_resource::<FlatSimulation>() {
            return Some(f(sim.buffers.current()));
        }
        if let Some(sim) = self.world.get_resource::<ChunkedSimulation>() {
            return Some(f(sim.buffers.current()));
        }
        None
    }
}

impl Default for SimulationRuntime {
    fn default() -> Self {
        Self::new()
    }
}
