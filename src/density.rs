//! Probability density targeting: exhaustive placement counting over the
//! surviving ship sizes, hit-chain boosts, parity pruning and isolation
//! pruning, with a signature-keyed cache.

use core::cmp::Reverse;
use core::fmt;
use std::collections::HashMap;

use crate::board::OpponentView;
use crate::config::{Tuning, BOARD_SIZE};
use crate::grid::{free_run, Coord, Mask};
use crate::ship::{surviving_sizes, Orientation};
use crate::targeting::{is_isolated, position_value, TargetingState};

const N: usize = BOARD_SIZE;

/// Per-cell likelihood weights for an undiscovered ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensityMap {
    cells: [[u32; N]; N],
}

impl DensityMap {
    pub fn get(&self, at: Coord) -> u32 {
        self.cells[at.y][at.x]
    }

    fn add(&mut self, at: Coord, weight: u32) {
        self.cells[at.y][at.x] += weight;
    }

    fn zero(&mut self, at: Coord) {
        self.cells[at.y][at.x] = 0;
    }
}

impl fmt::Display for DensityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..N {
            for x in 0..N {
                write!(f, "{:>4}", self.cells[y][x])?;
            }
            if y + 1 < N {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Composite key identifying the board and targeting state a map was
/// computed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapSignature {
    hits: u128,
    misses: u128,
    sunk: u128,
    chain: Vec<Coord>,
    axis: Option<Orientation>,
    sunk_set: u8,
    hunting: bool,
    parity: u8,
}

impl MapSignature {
    pub fn capture(view: &OpponentView, state: &TargetingState) -> Self {
        MapSignature {
            hits: view.hits().raw(),
            misses: view.misses().raw(),
            sunk: view.sunk_cells().raw(),
            chain: state.chain().to_vec(),
            axis: state.axis(),
            sunk_set: state.sunk().bits(),
            hunting: state.hunting(),
            parity: state.parity(),
        }
    }

    /// Whether a previously computed map is still usable: everything but the
    /// shot pattern unchanged, and at most three cells flipped since.
    fn close_to(&self, other: &MapSignature) -> bool {
        if self.chain != other.chain
            || self.axis != other.axis
            || self.sunk_set != other.sunk_set
            || self.hunting != other.hunting
            || self.parity != other.parity
            || self.sunk != other.sunk
        {
            return false;
        }
        let flips = (self.hits ^ other.hits) | (self.misses ^ other.misses);
        flips.count_ones() <= 3
    }
}

/// Bounded caches for density maps and free-run measurements. Both are
/// flushed whole once past their caps rather than evicted entry by entry.
#[derive(Debug)]
pub struct DensityCache {
    maps: HashMap<MapSignature, DensityMap>,
    last: Option<(MapSignature, DensityMap)>,
    runs: HashMap<(Coord, (i8, i8)), u32>,
    map_cap: usize,
    run_cap: usize,
}

impl DensityCache {
    pub fn new(map_cap: usize, run_cap: usize) -> Self {
        DensityCache {
            maps: HashMap::new(),
            last: None,
            runs: HashMap::new(),
            map_cap,
            run_cap,
        }
    }

    pub fn clear(&mut self) {
        self.maps.clear();
        self.runs.clear();
        self.last = None;
    }

    /// Current (density map, free-run) entry counts.
    pub fn entry_counts(&self) -> (usize, usize) {
        (self.maps.len(), self.runs.len())
    }

    fn run_for(&mut self, start: Coord, step: (isize, isize), blocked: &Mask) -> u32 {
        let key = (start, (step.0 as i8, step.1 as i8));
        if let Some(&run) = self.runs.get(&key) {
            return run;
        }
        let run = free_run(start, step, blocked) as u32;
        self.runs.insert(key, run);
        if self.runs.len() > self.run_cap {
            self.runs.clear();
        }
        run
    }
}

#[derive(Debug, Clone, Copy)]
struct Area {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl Area {
    fn full() -> Self {
        Area {
            x0: 0,
            x1: N - 1,
            y0: 0,
            y1: N - 1,
        }
    }
}

/// Compute (or reuse) the density map for the current view and targeting
/// state.
pub fn compute_density(
    view: &OpponentView,
    state: &TargetingState,
    tuning: &Tuning,
    cache: &mut DensityCache,
) -> DensityMap {
    let signature = MapSignature::capture(view, state);
    if let Some(map) = cache.maps.get(&signature) {
        return *map;
    }
    if let Some((last_sig, last_map)) = &cache.last {
        if last_sig.close_to(&signature) {
            return *last_map;
        }
    }

    let mut map = DensityMap::default();
    let sizes = surviving_sizes(state.sunk());
    let area = analysis_area(state, tuning);
    let excluded = view.sunk_exclusion();
    let window_blocked = view.misses() | excluded;

    for &len in &sizes {
        add_window_weights(&mut map, &window_blocked, area, len, Orientation::Horizontal);
        add_window_weights(&mut map, &window_blocked, area, len, Orientation::Vertical);
    }

    if state.chain().len() >= 2 {
        if let Some(axis) = state.axis() {
            add_chain_boosts(&mut map, view, state, axis, &excluded, tuning, cache);
        }
    }

    if state.hunting() {
        for y in 0..N {
            for x in 0..N {
                let c = Coord::new(x, y);
                if c.parity() != state.parity() {
                    map.zero(c);
                }
            }
        }
    }

    let smallest = state.smallest_surviving();
    for c in view.unresolved().iter() {
        if is_isolated(view, c, smallest) {
            map.zero(c);
        }
    }

    cache.maps.insert(signature.clone(), map);
    cache.last = Some((signature, map));
    if cache.maps.len() > cache.map_cap {
        cache.maps.clear();
    }
    map
}

/// Every window of `len` cells inside `area` that avoids misses and
/// sunk-adjacent cells adds a size-proportional weight to the cells it
/// covers.
fn add_window_weights(
    map: &mut DensityMap,
    blocked: &Mask,
    area: Area,
    len: usize,
    orientation: Orientation,
) {
    let (dx, dy) = orientation.step();
    let weight = (len * 2) as u32;
    let (x_max, y_max) = match orientation {
        Orientation::Horizontal => ((area.x1 + 1).saturating_sub(len), area.y1),
        Orientation::Vertical => (area.x1, (area.y1 + 1).saturating_sub(len)),
    };
    for y in area.y0..=y_max {
        for x in area.x0..=x_max {
            let origin = Coord::new(x, y);
            let cells = (0..len).filter_map(|i| origin.offset(dx * i as isize, dy * i as isize));
            if cells.clone().count() == len && cells.clone().all(|c| !blocked.get(c)) {
                for c in cells {
                    map.add(c, weight);
                }
            }
        }
    }
}

/// Directional boosts around an established chain: strong weight on the
/// on-axis continuations scaled by their open run, a line bonus two cells
/// ahead past a confirmed hit, and a light perpendicular weight while the
/// chain is still short.
fn add_chain_boosts(
    map: &mut DensityMap,
    view: &OpponentView,
    state: &TargetingState,
    axis: Orientation,
    excluded: &Mask,
    tuning: &Tuning,
    cache: &mut DensityCache,
) {
    let (sx, sy) = axis.step();
    let main_steps = [(sx, sy), (-sx, -sy)];
    let run_blocked = view.resolved() | *excluded;

    for &hit in state.chain() {
        for (dx, dy) in main_steps {
            let next = hit.offset(dx, dy);
            if let Some(n1) = next {
                if !view.is_resolved(n1) && !excluded.get(n1) {
                    let run = cache.run_for(n1, (dx, dy), &run_blocked);
                    map.add(n1, tuning.chain_boost + run * tuning.free_run_boost);
                }
            }
            if let Some(n2) = hit.offset(dx * 2, dy * 2) {
                if !view.is_resolved(n2) && !excluded.get(n2) {
                    let through_hit = next.is_some_and(|n1| view.is_hit(n1));
                    if through_hit {
                        map.add(n2, tuning.line_boost);
                    } else {
                        map.add(n2, tuning.chain_boost / 3);
                    }
                }
            }
        }
        if state.chain().len() <= 2 {
            for (dx, dy) in axis.cross_steps() {
                if let Some(n) = hit.offset(dx, dy) {
                    if !view.is_resolved(n) && !excluded.get(n) {
                        map.add(n, tuning.chain_boost / 5);
                    }
                }
            }
        }
    }
}

/// The board region worth analyzing: everything while hunting, otherwise the
/// chain's bounding box inflated by the analysis radius and the largest
/// surviving ship, widened so that ship still fits.
fn analysis_area(state: &TargetingState, tuning: &Tuning) -> Area {
    let chain = state.chain();
    if chain.is_empty() {
        return Area::full();
    }
    let largest = state.largest_surviving().unwrap_or(1);
    let reach = (tuning.analysis_radius + largest) as isize;

    let mut x0 = (N - 1) as isize;
    let mut x1 = 0isize;
    let mut y0 = (N - 1) as isize;
    let mut y1 = 0isize;
    for c in chain {
        x0 = x0.min(c.x as isize - reach);
        x1 = x1.max(c.x as isize + reach);
        y0 = y0.min(c.y as isize - reach);
        y1 = y1.max(c.y as isize + reach);
    }
    let mut area = Area {
        x0: x0.max(0) as usize,
        x1: x1.min((N - 1) as isize) as usize,
        y0: y0.max(0) as usize,
        y1: y1.min((N - 1) as isize) as usize,
    };

    if area.x1 + 1 - area.x0 < largest {
        area.x1 = (area.x0 + largest - 1).min(N - 1);
        area.x0 = (area.x1 + 1).saturating_sub(largest);
    }
    if area.y1 + 1 - area.y0 < largest {
        area.y1 = (area.y0 + largest - 1).min(N - 1);
        area.y0 = (area.y1 + 1).saturating_sub(largest);
    }
    area
}

/// Highest-weight unresolved cell, skipping sunk-adjacent and isolated
/// cells. Ties break on position value, then row-major order.
pub fn best_shot(
    map: &DensityMap,
    view: &OpponentView,
    state: &TargetingState,
) -> Option<Coord> {
    let excluded = view.sunk_exclusion();
    let smallest = state.smallest_surviving();
    let mut best: Option<u32> = None;
    let mut ties: Vec<Coord> = Vec::new();

    for y in 0..N {
        for x in 0..N {
            let c = Coord::new(x, y);
            if view.is_resolved(c) || excluded.get(c) || is_isolated(view, c, smallest) {
                continue;
            }
            let weight = map.get(c);
            match best {
                Some(top) if weight < top => {}
                Some(top) if weight == top => ties.push(c),
                _ => {
                    best = Some(weight);
                    ties.clear();
                    ties.push(c);
                }
            }
        }
    }

    ties.sort_by_key(|c| (Reverse(position_value(view, *c)), c.y, c.x));
    ties.first().copied()
}
