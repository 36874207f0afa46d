//! The owned-state opponent engine behind the orchestrator interface.
//!
//! One [`AiEngine`] is bound to one match. The orchestrator drives it
//! strictly turn by turn: `place_fleet` once, then `choose_shot` /
//! `record_shot_result` per shot and `notify_ship_sunk` on kills. Every
//! failure path resolves into a legal move; nothing here panics during
//! normal play.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::OpponentView;
use crate::config::Tuning;
use crate::density::{best_shot, compute_density, DensityCache};
use crate::grid::Coord;
use crate::placement::{place_fleet, FleetLayout, PlacementStyle};
use crate::ship::ShipKind;
use crate::targeting::{
    chain_backward, chain_forward, is_isolated, perpendicular_probe, single_hit_probe_ranked,
    single_hit_probe_shuffled, Pruning, TargetingState,
};

/// Opponent strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniform random shots over unresolved, non-isolated cells.
    Easy,
    /// Chain following and single-hit neighbors; random otherwise.
    Medium,
    /// Full targeting, density map, parity pruning and strategic placement.
    Hard,
}

/// Serializable targeting state of an engine, for the surrounding game's
/// persistence layer. Caches are rebuilt on restore, not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub difficulty: Difficulty,
    pub tuning: Tuning,
    pub targeting: TargetingState,
}

/// The computer opponent's decision engine for one match.
pub struct AiEngine {
    difficulty: Difficulty,
    tuning: Tuning,
    targeting: TargetingState,
    cache: DensityCache,
}

impl AiEngine {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        Self::with_tuning(difficulty, Tuning::default(), rng)
    }

    pub fn with_tuning<R: Rng + ?Sized>(
        difficulty: Difficulty,
        tuning: Tuning,
        rng: &mut R,
    ) -> Self {
        let parity = if rng.random() { 1 } else { 0 };
        let cache = DensityCache::new(tuning.density_cache_cap, tuning.free_run_cache_cap);
        AiEngine {
            difficulty,
            tuning,
            targeting: TargetingState::new(parity),
            cache,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Read access to the targeting state, for diagnostics and tests.
    pub fn targeting(&self) -> &TargetingState {
        &self.targeting
    }

    /// Current (density map, free-run) cache entry counts.
    pub fn cache_entries(&self) -> (usize, usize) {
        self.cache.entry_counts()
    }

    /// Place the engine's own fleet. Best effort: ships that survive both
    /// attempt caps unplaced are reported in the layout, never as an error.
    pub fn place_fleet<R: Rng + ?Sized>(&self, rng: &mut R) -> FleetLayout {
        let style = match self.difficulty {
            Difficulty::Hard => PlacementStyle::Strategic,
            _ => PlacementStyle::Random,
        };
        place_fleet(rng, style, &self.tuning)
    }

    /// Pick the next shot. Returns a legal unresolved coordinate whenever
    /// one exists, `None` only on an exhausted board.
    pub fn choose_shot<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        view: &OpponentView,
    ) -> Option<Coord> {
        let shot = match self.difficulty {
            Difficulty::Easy => self.random_shot(rng, view),
            Difficulty::Medium => self.medium_shot(rng, view),
            Difficulty::Hard => self.hard_shot(rng, view),
        };
        if let Some(at) = shot {
            debug!("{:?} tier fires at {at}", self.difficulty);
        }
        shot
    }

    /// Feed back the outcome of the engine's last shot.
    pub fn record_shot_result(&mut self, at: Coord, was_hit: bool) {
        self.targeting.record_shot(at, was_hit);
    }

    /// A specific enemy ship was confirmed destroyed.
    pub fn notify_ship_sunk(&mut self, kind: ShipKind) {
        self.targeting.note_sunk(kind);
        self.cache.clear();
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            difficulty: self.difficulty,
            tuning: self.tuning.clone(),
            targeting: self.targeting.clone(),
        }
    }

    pub fn restore(snapshot: EngineSnapshot) -> Self {
        let cache = DensityCache::new(
            snapshot.tuning.density_cache_cap,
            snapshot.tuning.free_run_cache_cap,
        );
        AiEngine {
            difficulty: snapshot.difficulty,
            tuning: snapshot.tuning,
            targeting: snapshot.targeting,
            cache,
        }
    }

    /// Uniform random shot over unresolved, non-isolated cells, widening to
    /// any unresolved cell before giving up.
    fn random_shot<R: Rng + ?Sized>(&self, rng: &mut R, view: &OpponentView) -> Option<Coord> {
        let smallest = self.targeting.smallest_surviving();
        let mut pool: Vec<Coord> = view
            .unresolved()
            .iter()
            .filter(|c| !is_isolated(view, *c, smallest))
            .collect();
        if pool.is_empty() {
            pool = view.unresolved().iter().collect();
        }
        if pool.is_empty() {
            None
        } else {
            Some(pool[rng.random_range(0..pool.len())])
        }
    }

    fn medium_shot<R: Rng + ?Sized>(&mut self, rng: &mut R, view: &OpponentView) -> Option<Coord> {
        let pruning = Pruning {
            smallest: self.targeting.smallest_surviving(),
            sunk_excl: None,
        };
        if self.targeting.chain().len() >= 2 {
            if let Some(at) = chain_forward(&self.targeting, view, &pruning)
                .or_else(|| chain_backward(&self.targeting, view, &pruning))
            {
                return Some(at);
            }
        }
        if self.targeting.chain().len() == 1 {
            if let Some(at) = single_hit_probe_shuffled(&self.targeting, view, &pruning, rng) {
                return Some(at);
            }
        }
        self.random_shot(rng, view)
    }

    fn hard_shot<R: Rng + ?Sized>(&mut self, rng: &mut R, view: &OpponentView) -> Option<Coord> {
        let pruning = Pruning {
            smallest: self.targeting.smallest_surviving(),
            sunk_excl: Some(view.sunk_exclusion()),
        };
        if self.targeting.chain().len() >= 2 {
            if let Some(at) = chain_forward(&self.targeting, view, &pruning)
                .or_else(|| chain_backward(&self.targeting, view, &pruning))
                .or_else(|| perpendicular_probe(&self.targeting, view, &pruning))
            {
                return Some(at);
            }
        } else if self.targeting.chain().len() == 1 {
            if let Some(at) = single_hit_probe_ranked(&self.targeting, view, &pruning) {
                return Some(at);
            }
        }

        if self.targeting.hunting() {
            self.targeting.adapt_parity();
        }
        let map = compute_density(view, &self.targeting, &self.tuning, &mut self.cache);
        best_shot(&map, view, &self.targeting).or_else(|| self.random_shot(rng, view))
    }
}
