//! Basic demonstration of the Game of Life simulation core.
//!
//! Run with: cargo run --example basic_demo

use gol_sim::{format_bytes, GridRepresentation, SimConfig, SimulationRuntime};

fn main() {
    println!("=== Game of Life - Grid Simulation Core Demo ===\n");

    // A glider on a 64x64 chunked grid, ticking at 10 Hz.
    let config = SimConfig {
        grid_axis_size: 64,
        updates_per_second: 10.0,
        use_random_initialization: false,
        initial_alive_cells: vec![(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)],
        grid_representation: GridRepresentation::Chunked,
    };

    let mut sim = SimulationRuntime::new();
    sim.reset_seeded(config, 1).expect("valid configuration");

    let stats = sim.stats().unwrap();
    println!(
        "Grid: {0}x{0} ({1} cells), required memory: {2}",
        stats.axis_size,
        stats.cell_count,
        format_bytes(stats.memory_bytes)
    );
    println!("Initial population: {}\n", stats.population);

    // Drive the simulation at 50 frames per second of wall-clock time.
    println!("Running 4 seconds of simulated time (40 ticks at 10 Hz)...\n");
    for _ in 0..200 {
        sim.step(0.02);
    }

    print_grid(&sim, 0, 12);

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", sim.stats().unwrap().to_json_pretty().unwrap());

    #[cfg(feature = "profile")]
    sim.profiler().print_summary();
}

/// Print a corner of the grid to the terminal.
fn print_grid(sim: &SimulationRuntime, origin: u32, extent: u32) {
    println!("--- Tick {} ---", sim.current_tick());
    for y in origin..origin + extent {
        let row: String = (origin..origin + extent)
            .map(|x| if sim.get_cell(x, y) { 'O' } else { '.' })
            .collect();
        println!("  {}", row);
    }
}
