//! Lightweight tick profiling.
//!
//! Measures wall-clock time per simulation tick (kernel plus swap), the
//! in-library replacement for the engine-side profiler markers the original
//! grid code leaned on.
//!
//! Enable with the `profile` feature:
//! ```bash
//! cargo run --example basic_demo --release --features profile
//! ```

use std::time::Duration;

/// Aggregated timing for completed ticks.
#[derive(Debug, Default, Clone)]
pub struct TickProfiler {
    total_time: Duration,
    tick_count: u64,
    min_time: Option<Duration>,
    max_time: Option<Duration>,
    last_time: Duration,
}

impl TickProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the duration of one completed tick.
    pub fn record_tick(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.tick_count += 1;
        self.last_time = elapsed;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }

    /// Number of ticks recorded.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Duration of the most recent tick.
    pub fn last_time(&self) -> Duration {
        self.last_time
    }

    /// Mean tick duration.
    pub fn avg_time(&self) -> Duration {
        if self.tick_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.tick_count as u32
        }
    }

    /// Ticks per second the kernel could sustain at the mean duration.
    pub fn effective_tick_rate(&self) -> f64 {
        let avg = self.avg_time().as_secs_f64();
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }

    /// Print an aggregated summary.
    pub fn print_summary(&self) {
        println!("\n=== Tick Profiler ({} ticks) ===", self.tick_count);
        println!("{:<12} {:>12.2?}", "Total", self.total_time);
        println!("{:<12} {:>12.2?}", "Avg", self.avg_time());
        println!(
            "{:<12} {:>12.2?}",
            "Min",
            self.min_time.unwrap_or(Duration::ZERO)
        );
        println!(
            "{:<12} {:>12.2?}",
            "Max",
            self.max_time.unwrap_or(Duration::ZERO)
        );
        println!("Sustainable rate: {:.1} ticks/s\n", self.effective_tick_rate());
    }

    /// Reset all recorded data.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
