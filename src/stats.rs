//! Serializable simulation statistics.
//!
//! `SimStats` is the lightweight snapshot handed to UI/overlay clients:
//! tick count, grid geometry, population, and memory footprint. Cell data
//! itself moves through the accessor contract (`get_cell`, the chunk word
//! view), never through JSON.

use serde::{Deserialize, Serialize};

/// Point-in-time statistics of the active simulation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimStats {
    /// Ticks completed since the last reset.
    pub tick: u64,
    /// Side length of the square grid in cells.
    pub axis_size: u32,
    /// Simulated cells (`axis_size^2`).
    pub cell_count: u64,
    /// Live cells.
    pub population: u64,
    /// Backing storage of both buffers, in bytes.
    pub memory_bytes: usize,
}

impl SimStats {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a byte count as a human-readable string ("2.5 MB").
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512.00 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_stats_json_round_trip() {
        let stats = SimStats {
            tick: 42,
            axis_size: 256,
            cell_count: 65536,
            population: 31000,
            memory_bytes: 16640,
        };
        let json = stats.to_json().unwrap();
        let parsed: SimStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tick, 42);
        assert_eq!(parsed.population, 31000);
    }
}
