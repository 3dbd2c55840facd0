//! Grid initialization.
//!
//! Two modes, selected by `SimConfig::use_random_initialization`:
//!
//! - **Explicit**: every coordinate in `initial_alive_cells` is set alive;
//!   everything else stays dead from the zeroed allocation.
//! - **Random**: a master seed is drawn once and each parallel worker slot
//!   `i` derives its own stream seed by multiplying the master seed by 3,
//!   `i + 1` times (the sequential `seed *= 3` scheme). Worker `i` owns a
//!   contiguous run of backing *words* and draws one boolean per interior
//!   cell from its own stream.
//!
//! Determinism: for a fixed master seed and a fixed worker count the live
//! cell set is identical across runs. It is NOT stable across different
//! worker counts, because the word partition depends on how many slots the
//! range is split into. Partitioning by whole words (instead of by cell
//! index) is what keeps concurrent writers off each other's words; see the
//! kernel module notes on the sub-word write race.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::grid::{BitGrid, CellGrid, ChunkGrid};

/// Stream seed for worker slot `slot`: master seed multiplied by 3,
/// `slot + 1` times, with wrapping arithmetic.
fn worker_seed(master_seed: u64, slot: usize) -> u64 {
    let mut seed = master_seed;
    for _ in 0..=slot {
        seed = seed.wrapping_mul(3);
    }
    seed
}

/// Number of worker slots the word range is split into.
fn worker_count() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads().max(1)
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// One random word of the flat grid's padded bit buffer. Only interior bits
/// draw from the stream; ghost ring bits stay dead.
fn random_bit_word(rng: &mut StdRng, word_idx: usize, padded: usize, total_bits: usize) -> u64 {
    let base = word_idx * 64;
    let mut out = 0u64;
    for bit in 0..64 {
        let idx = base + bit;
        if idx >= total_bits {
            break;
        }
        let px = idx % padded;
        let py = idx / padded;
        if px == 0 || py == 0 || px == padded - 1 || py == padded - 1 {
            continue;
        }
        if rng.gen::<bool>() {
            out |= 1 << bit;
        }
    }
    out
}

/// One random chunk word. Ghost chunks draw nothing and stay dead.
fn random_chunk_word(rng: &mut StdRng, word_idx: usize, cols: usize, rows: usize) -> u32 {
    let cx = word_idx % cols;
    let cy = word_idx / cols;
    if cx == 0 || cy == 0 || cx == cols - 1 || cy == rows - 1 {
        return 0;
    }
    let mut out = 0u32;
    for bit in 0..32 {
        if rng.gen::<bool>() {
            out |= 1 << bit;
        }
    }
    out
}

/// Fill a flat grid from per-worker seeded random streams.
pub fn randomize_bit_grid(grid: &mut BitGrid, master_seed: u64) {
    let padded = grid.padded_axis();
    let total_bits = grid.padded_bit_count();
    let words = grid.words_mut();
    let span = words.len().div_ceil(worker_count());

    let fill_slot = |slot: usize, slice: &mut [u64]| {
        let mut rng = StdRng::seed_from_u64(worker_seed(master_seed, slot));
        for (offset, word) in slice.iter_mut().enumerate() {
            *word = random_bit_word(&mut rng, slot * span + offset, padded, total_bits);
        }
    };

    #[cfg(feature = "parallel")]
    words
        .par_chunks_mut(span)
        .enumerate()
        .for_each(|(slot, slice)| fill_slot(slot, slice));

    #[cfg(not(feature = "parallel"))]
    for (slot, slice) in words.chunks_mut(span).enumerate() {
        fill_slot(slot, slice);
    }
}

/// Fill a chunk grid from per-worker seeded random streams.
pub fn randomize_chunk_grid(grid: &mut ChunkGrid, master_seed: u64) {
    let cols = grid.chunk_cols();
    let rows = grid.chunk_rows();
    let words = grid.words_mut();
    let span = words.len().div_ceil(worker_count());

    let fill_slot = |slot: usize, slice: &mut [u32]| {
        let mut rng = StdRng::seed_from_u64(worker_seed(master_seed, slot));
        for (offset, word) in slice.iter_mut().enumerate() {
            *word = random_chunk_word(&mut rng, slot * span + offset, cols, rows);
        }
    };

    #[cfg(feature = "parallel")]
    words
        .par_chunks_mut(span)
        .enumerate()
        .for_each(|(slot, slice)| fill_slot(slot, slice));

    #[cfg(not(feature = "parallel"))]
    for (slot, slice) in words.chunks_mut(span).enumerate() {
        fill_slot(slot, slice);
    }
}

/// Set every coordinate of `cells` alive. Coordinates must already be
/// validated against the axis size.
pub fn apply_initial_cells<G: CellGrid>(grid: &mut G, cells: &[(u32, u32)]) {
    for &(x, y) in cells {
        grid.set_cell(x, y, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_cells_set_and_nothing_else() {
        let mut grid = BitGrid::allocate(16).unwrap();
        let cells = [(0, 0), (3, 7), (15, 15)];
        apply_initial_cells(&mut grid, &cells);
        assert_eq!(grid.population(), 3);
        for (x, y) in cells {
            assert!(grid.get_cell(x as i32, y as i32));
        }
    }

    #[test]
    fn test_random_fill_is_deterministic_for_fixed_seed() {
        let mut a = BitGrid::allocate(64).unwrap();
        let mut b = BitGrid::allocate(64).unwrap();
        randomize_bit_grid(&mut a, 12345);
        randomize_bit_grid(&mut b, 12345);
        assert_eq!(a.words(), b.words());

        let mut a = ChunkGrid::allocate(64).unwrap();
        let mut b = ChunkGrid::allocate(64).unwrap();
        randomize_chunk_grid(&mut a, 12345);
        randomize_chunk_grid(&mut b, 12345);
        assert_eq!(a.words(), b.words());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = BitGrid::allocate(64).unwrap();
        let mut b = BitGrid::allocate(64).unwrap();
        randomize_bit_grid(&mut a, 1);
        randomize_bit_grid(&mut b, 2);
        assert_ne!(a.words(), b.words());
    }

    #[test]
    fn test_random_fill_leaves_ghost_border_dead() {
        let mut grid = ChunkGrid::allocate(32).unwrap();
        randomize_chunk_grid(&mut grid, 99);
        let cols = grid.chunk_cols();
        let rows = grid.chunk_rows();
        for (idx, &word) in grid.words().iter().enumerate() {
            let cx = idx % cols;
            let cy = idx / cols;
            if cx == 0 || cy == 0 || cx == cols - 1 || cy == rows - 1 {
                assert_eq!(word, 0, "ghost word {} written by random fill", idx);
            }
        }

        let mut grid = BitGrid::allocate(32).unwrap();
        randomize_bit_grid(&mut grid, 99);
        for i in -1..=32 {
            assert!(!grid.get_cell(i, -1));
            assert!(!grid.get_cell(i, 32));
            assert!(!grid.get_cell(-1, i));
            assert!(!grid.get_cell(32, i));
        }
    }

    #[test]
    fn test_random_fill_is_roughly_half_alive() {
        let mut grid = BitGrid::allocate(128).unwrap();
        randomize_bit_grid(&mut grid, 7);
        let population = grid.population();
        let cells = grid.cell_count();
        assert!(population > cells * 4 / 10 && population < cells * 6 / 10);
    }

    #[test]
    fn test_worker_seed_is_sequential_multiply() {
        assert_eq!(worker_seed(5, 0), 15);
        assert_eq!(worker_seed(5, 1), 45);
        assert_eq!(worker_seed(5, 2), 135);
    }
}
