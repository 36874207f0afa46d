use serde::{Deserialize, Serialize};

/// Grid side length. Both fleets play on a square board of this size.
pub const BOARD_SIZE: usize = 10;

/// Randomized placement attempts per ship before the adjacency rule is
/// relaxed, and again before the ship is reported unplaced.
pub const PLACEMENT_ATTEMPTS: usize = 500;

/// Numeric knobs for the hard-tier heuristics.
///
/// Tests occasionally shrink the cache caps to exercise the flush path;
/// everything else normally stays at the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Bonus on the on-axis neighbors of hit-chain cells.
    pub chain_boost: u32,
    /// Per-cell multiplier for the open run beyond a chain neighbor.
    pub free_run_boost: u32,
    /// Bonus two cells ahead of a chain cell when the intervening cell is a
    /// confirmed hit.
    pub line_boost: u32,
    /// Strategic placement pattern mix.
    pub edge_weight: f64,
    pub center_weight: f64,
    pub cluster_weight: f64,
    /// Half-width of the density analysis window around the hit chain.
    pub analysis_radius: usize,
    /// Density-map cache entry count that triggers a full flush.
    pub density_cache_cap: usize,
    /// Free-run cache entry count that triggers a full flush.
    pub free_run_cache_cap: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            chain_boost: 15,
            free_run_boost: 5,
            line_boost: 10,
            edge_weight: 0.4,
            center_weight: 0.3,
            cluster_weight: 0.3,
            analysis_radius: 3,
            density_cache_cap: 100,
            free_run_cache_cap: 1000,
        }
    }
}
