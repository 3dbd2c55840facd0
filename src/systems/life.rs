//! Game of Life update kernel and tick systems.
//!
//! One tick applies the B3/S23 rule to every cell: read the 3x3 neighborhood
//! from `current`, write the new state into `next`, join, then swap the
//! buffers. Within the tick no worker ever reads `next`, so reads and writes
//! live on disjoint buffers and neighbor reads always see the grid as it was
//! at tick start. The ghost border keeps every neighborhood read in bounds.
//!
//! ## Parallel partitioning
//!
//! With `--features parallel` the kernel fans out over the *backing words*
//! of `next`, not over individual cells. `set_cell` on either representation
//! is a non-atomic read-modify-write of a multi-cell word, so a per-cell
//! partition would let two workers race on the word their cells share. Each
//! worker here exclusively owns whole output words and reads `current` as
//! shared state, which needs no atomics.
//!
//! ## Timer gating
//!
//! Ticks are gated by [`UpdateTimer`]: elapsed wall-clock time accumulates
//! and a tick runs only once the accumulator reaches `1 / updates_per_second`.
//! The accumulator then resets to zero rather than being decremented, so a
//! slow frame never queues a burst of catch-up ticks: at most one tick runs
//! per external step call.

use bevy_ecs::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::grid::{BitGrid, CellGrid, ChunkGrid, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::state::{ActiveSimulation, ChunkedSimulation, FlatSimulation};

/// The 8 neighbor offsets of the Moore neighborhood.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Wall-clock time handed to the tick systems for the current step call.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// Monotonic tick counter, incremented once per completed tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Fixed-rate gate for the update kernel.
#[derive(Resource, Debug, Clone, Copy)]
pub struct UpdateTimer {
    /// Accumulated wall-clock time since the last tick, in seconds.
    pub elapsed: f32,
    /// Tick threshold, `1 / updates_per_second`.
    pub interval: f32,
}

impl UpdateTimer {
    pub fn from_rate(updates_per_second: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval: 1.0 / updates_per_second,
        }
    }

    /// Accumulate `dt` and report whether a tick is due. On a due tick the
    /// accumulator resets to zero (not `elapsed -= interval`), so at most
    /// one tick fires per step call.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = 0.0;
        true
    }
}

/// Next state of cell `(x, y)`: alive iff it has exactly 3 live neighbors,
/// or it is alive with exactly 2. The ghost border guarantees the eight
/// neighbor reads never leave the buffer and read dead off-grid.
#[inline(always)]
pub fn next_cell_state<G: CellGrid>(grid: &G, x: i32, y: i32) -> bool {
    let mut alive_neighbors = 0;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        alive_neighbors += grid.get_cell(x + dx, y + dy) as u32;
    }
    alive_neighbors == 3 || (grid.get_cell(x, y) && alive_neighbors == 2)
}

/// Compute one output word of a flat grid's padded bit buffer.
#[inline]
fn bit_grid_word(current: &BitGrid, word_idx: usize) -> u64 {
    let padded = current.padded_axis();
    let total_bits = current.padded_bit_count();
    let base = word_idx * 64;
    let mut out = 0u64;
    for bit in 0..64 {
        let idx = base + bit;
        if idx >= total_bits {
            break;
        }
        let px = idx % padded;
        let py = idx / padded;
        // Ghost ring bits stay dead.
        if px == 0 || py == 0 || px == padded - 1 || py == padded - 1 {
            continue;
        }
        if next_cell_state(current, px as i32 - 1, py as i32 - 1) {
            out |= 1 << bit;
        }
    }
    out
}

/// Compute one output chunk word. Ghost chunks stay zero.
#[inline]
fn chunk_grid_word(current: &ChunkGrid, word_idx: usize) -> u32 {
    let cols = current.chunk_cols();
    let rows = current.chunk_rows();
    let cx = word_idx % cols;
    let cy = word_idx / cols;
    if cx == 0 || cy == 0 || cx == cols - 1 || cy == rows - 1 {
        return 0;
    }
    let mut out = 0u32;
    for bit in 0..32u32 {
        let x = (cx as u32 - 1) * CHUNK_WIDTH + bit % CHUNK_WIDTH;
        let y = (cy as u32 - 1) * CHUNK_HEIGHT + bit / CHUNK_WIDTH;
        if next_cell_state(current, x as i32, y as i32) {
            out |= 1 << bit;
        }
    }
    out
}

/// Run one tick on a flat grid pair: `current` read-only, `next` write-only.
pub fn step_bit_grid(current: &BitGrid, next: &mut BitGrid) {
    debug_assert_eq!(current.axis_size(), next.axis_size());
    let words = next.words_mut();

    #[cfg(feature = "parallel")]
    words
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, word)| *word = bit_grid_word(current, idx));

    #[cfg(not(feature = "parallel"))]
    for (idx, word) in words.iter_mut().enumerate() {
        *word = bit_grid_word(current, idx);
    }
}

/// Run one tick on a chunk grid pair.
pub fn step_chunk_grid(current: &ChunkGrid, next: &mut ChunkGrid) {
    debug_assert_eq!(current.axis_size(), next.axis_size());
    let words = next.words_mut();

    #[cfg(feature = "parallel")]
    words
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, word)| *word = chunk_grid_word(current, idx));

    #[cfg(not(feature = "parallel"))]
    for (idx, word) in words.iter_mut().enumerate() {
        *word = chunk_grid_word(current, idx);
    }
}

/// Tick system for the flat representation. Runs only while the
/// `ActiveSimulation` marker is present.
///
/// - Reads: `ActiveSimulation`, `DeltaTime`
/// - Writes: `UpdateTimer`, `FlatSimulation`, `SimTick`
pub fn flat_life_system(
    active: Option<Res<ActiveSimulation>>,
    dt: Res<DeltaTime>,
    mut timer: ResMut<UpdateTimer>,
    mut sim: ResMut<FlatSimulation>,
    mut tick: ResMut<SimTick>,
) {
    if active.is_none() || !timer.advance(dt.0) {
        return;
    }
    let (current, next) = sim.buffers.split();
    step_bit_grid(current, next);
    sim.buffers.swap();
    tick.increment();
}

/// Tick system for the chunked representation. Runs only while the
/// `ActiveSimulation` marker is present.
///
/// - Reads: `ActiveSimulation`, `DeltaTime`
/// - Writes: `UpdateTimer`, `ChunkedSimulation`, `SimTick`
pub fn chunked_life_system(
    active: Option<Res<ActiveSimulation>>,
    dt: Res<DeltaTime>,
    mut timer: ResMut<UpdateTimer>,
    mut sim: ResMut<ChunkedSimulation>,
    mut tick: ResMut<SimTick>,
) {
    if active.is_none() || !timer.advance(dt.0) {
        return;
    }
    let (current, next) = sim.buffers.split();
    step_chunk_grid(current, next);
    sim.buffers.swap();
    tick.increment();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn live_cells<G: CellGrid>(grid: &G) -> Vec<(i32, i32)> {
        let axis = grid.axis_size() as i32;
        let mut cells = Vec::new();
        for y in 0..axis {
            for x in 0..axis {
                if grid.get_cell(x, y) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn test_rule_table_all_512_neighborhoods() {
        // Enumerate every 3x3 configuration on a 3x3 flat grid and check
        // the center cell against the canonical B3/S23 table.
        for pattern in 0u32..512 {
            let mut grid = BitGrid::allocate(3).unwrap();
            for i in 0..9 {
                if (pattern >> i) & 1 == 1 {
                    grid.set_cell(i % 3, i / 3, true);
                }
            }
            let neighbors = (pattern & !(1 << 4)).count_ones();
            let center = (pattern >> 4) & 1 == 1;
            let expected = neighbors == 3 || (center && neighbors == 2);

            assert_eq!(
                next_cell_state(&grid, 1, 1),
                expected,
                "pattern {:#011b}: center {} with {} neighbors",
                pattern,
                center,
                neighbors
            );

            let mut next = BitGrid::allocate(3).unwrap();
            step_bit_grid(&grid, &mut next);
            assert_eq!(next.get_cell(1, 1), expected);
        }
    }

    #[test]
    fn test_block_is_stable() {
        let mut buffers = crate::double_buffer::DoubleBuffer::<BitGrid>::allocate(16).unwrap();
        for (x, y) in [(5, 5), (5, 6), (6, 5), (6, 6)] {
            buffers.current_mut().set_cell(x, y, true);
        }
        for _ in 0..8 {
            let (current, next) = buffers.split();
            step_bit_grid(current, next);
            buffers.swap();
            assert_eq!(
                live_cells(buffers.current()),
                vec![(5, 5), (6, 5), (5, 6), (6, 6)]
            );
        }
    }

    #[test]
    fn test_blinker_oscillates_with_period_2() {
        let mut buffers = crate::double_buffer::DoubleBuffer::<BitGrid>::allocate(16).unwrap();
        let horizontal = vec![(4, 5), (5, 5), (6, 5)];
        let vertical = vec![(5, 4), (5, 5), (5, 6)];
        for &(x, y) in &horizontal {
            buffers.current_mut().set_cell(x as u32, y as u32, true);
        }
        for generation in 1..=6 {
            let (current, next) = buffers.split();
            step_bit_grid(current, next);
            buffers.swap();
            let expected = if generation % 2 == 1 { &vertical } else { &horizontal };
            assert_eq!(&live_cells(buffers.current()), expected);
        }
    }

    #[test]
    fn test_glider_translates_by_one_after_four_ticks() {
        let mut buffers = crate::double_buffer::DoubleBuffer::<BitGrid>::allocate(16).unwrap();
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        for (dx, dy) in glider {
            buffers.current_mut().set_cell(1 + dx, 1 + dy, true);
        }
        let start = live_cells(buffers.current());

        for _ in 0..4 {
            let (current, next) = buffers.split();
            step_bit_grid(current, next);
            buffers.swap();
        }

        let mut translated: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        translated.sort();
        let mut after = live_cells(buffers.current());
        after.sort();
        assert_eq!(after, translated);
    }

    #[test]
    fn test_blinker_on_chunk_grid() {
        let mut buffers = crate::double_buffer::DoubleBuffer::<ChunkGrid>::allocate(32).unwrap();
        for (x, y) in [(4, 5), (5, 5), (6, 5)] {
            buffers.current_mut().set_cell(x, y, true);
        }
        let (current, next) = buffers.split();
        step_chunk_grid(current, next);
        buffers.swap();
        assert_eq!(live_cells(buffers.current()), vec![(5, 4), (5, 5), (5, 6)]);
    }

    #[test]
    fn test_representations_agree_on_random_grid() {
        // The same soup must evolve identically on both representations.
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut flat = crate::double_buffer::DoubleBuffer::<BitGrid>::allocate(32).unwrap();
        let mut chunked = crate::double_buffer::DoubleBuffer::<ChunkGrid>::allocate(32).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                if rng.gen::<bool>() {
                    flat.current_mut().set_cell(x, y, true);
                    chunked.current_mut().set_cell(x, y, true);
                }
            }
        }
        for _ in 0..5 {
            let (current, next) = flat.split();
            step_bit_grid(current, next);
            flat.swap();
            let (current, next) = chunked.split();
            step_chunk_grid(current, next);
            chunked.swap();
        }
        assert_eq!(live_cells(flat.current()), live_cells(chunked.current()));
    }

    #[test]
    fn test_cells_at_the_edge_die_against_the_border() {
        // A blinker touching the edge interacts with the dead border, not
        // with wrapped-around cells from the far side.
        let mut buffers = crate::double_buffer::DoubleBuffer::<BitGrid>::allocate(4).unwrap();
        for (x, y) in [(0, 0), (1, 0), (2, 0)] {
            buffers.current_mut().set_cell(x, y, true);
        }
        let (current, next) = buffers.split();
        step_bit_grid(current, next);
        buffers.swap();
        assert_eq!(live_cells(buffers.current()), vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn test_update_timer_fires_at_most_once_per_step() {
        let mut timer = UpdateTimer::from_rate(10.0);
        assert!(!timer.advance(0.05));
        assert!(timer.advance(0.06));
        // Reset to zero, not decremented by the threshold: the 0.01 excess
        // from the previous call is gone.
        assert!(!timer.advance(0.09));
        // A huge frame still yields a single tick.
        assert!(timer.advance(5.0));
        assert_eq!(timer.elapsed, 0.0);
    }
}
