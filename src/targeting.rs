//! The hunt/target/sink state machine and the shared position heuristics.
//!
//! The engine keeps one hit chain at a time: the ordered confirmed hits on
//! the ship currently being pursued. Once two hits are in the chain the
//! pursuit axis is fixed and the chain is kept sorted along it, so the two
//! ends always give a stable forward and backward continuation.

use core::cmp::Reverse;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::OpponentView;
use crate::config::BOARD_SIZE;
use crate::grid::{free_run, Coord, Mask, ORTHO_STEPS};
use crate::ship::{surviving_sizes, Orientation, ShipKind, ShipSet};

/// Mutable targeting state carried across turns of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingState {
    chain: Vec<Coord>,
    axis: Option<Orientation>,
    sunk: ShipSet,
    parity: u8,
}

impl TargetingState {
    pub fn new(parity: u8) -> Self {
        TargetingState {
            chain: Vec::new(),
            axis: None,
            sunk: ShipSet::empty(),
            parity: parity & 1,
        }
    }

    pub fn chain(&self) -> &[Coord] {
        &self.chain
    }

    pub fn axis(&self) -> Option<Orientation> {
        self.axis
    }

    pub fn sunk(&self) -> ShipSet {
        self.sunk
    }

    /// The checkerboard color class currently hunted on.
    pub fn parity(&self) -> u8 {
        self.parity
    }

    /// Whether no ship is currently being pursued.
    pub fn hunting(&self) -> bool {
        self.chain.is_empty()
    }

    /// Feed back the outcome of the engine's last shot. Hits extend the
    /// chain; the second hit fixes the pursuit axis and sorts the chain
    /// along it.
    pub fn record_shot(&mut self, at: Coord, was_hit: bool) {
        if !was_hit {
            return;
        }
        self.chain.push(at);
        if self.axis.is_none() && self.chain.len() >= 2 {
            let (first, second) = (self.chain[0], self.chain[1]);
            if first.x != second.x {
                self.axis = Some(Orientation::Horizontal);
            } else if first.y != second.y {
                self.axis = Some(Orientation::Vertical);
            }
            debug!("pursuit axis fixed to {:?} after {at}", self.axis);
        }
        match self.axis {
            Some(Orientation::Horizontal) => self.chain.sort_unstable_by_key(|c| c.x),
            Some(Orientation::Vertical) => self.chain.sort_unstable_by_key(|c| c.y),
            None => {}
        }
    }

    /// A ship was confirmed destroyed: remember it and drop the chain.
    pub fn note_sunk(&mut self, kind: ShipKind) {
        self.sunk.insert(kind);
        self.chain.clear();
        self.axis = None;
        debug!("{kind} sunk, chain cleared ({} ships down)", self.sunk.len());
    }

    pub fn smallest_surviving(&self) -> Option<usize> {
        surviving_sizes(self.sunk).into_iter().min()
    }

    pub fn largest_surviving(&self) -> Option<usize> {
        surviving_sizes(self.sunk).into_iter().max()
    }

    /// Force the hunting parity when every surviving ship shares one: all
    /// odd lengths hunt color 1, all even lengths color 0.
    pub fn adapt_parity(&mut self) {
        let sizes = surviving_sizes(self.sunk);
        if sizes.is_empty() {
            return;
        }
        if sizes.iter().all(|s| s % 2 == 1) {
            self.parity = 1;
        } else if sizes.iter().all(|s| s % 2 == 0) {
            self.parity = 0;
        }
    }
}

/// Candidate filters applied to every prospective shot. Medium difficulty
/// runs without the sunk-adjacency exclusion.
#[derive(Debug, Clone)]
pub(crate) struct Pruning {
    pub smallest: Option<usize>,
    pub sunk_excl: Option<Mask>,
}

impl Pruning {
    pub fn allows(&self, view: &OpponentView, at: Coord) -> bool {
        at.in_bounds()
            && !view.is_resolved(at)
            && !self.sunk_excl.as_ref().is_some_and(|m| m.get(at))
            && !is_isolated(view, at, self.smallest)
    }
}

/// One cell past the chain's maximal end along the pursuit axis.
pub(crate) fn chain_forward(
    state: &TargetingState,
    view: &OpponentView,
    pruning: &Pruning,
) -> Option<Coord> {
    let (dx, dy) = state.axis()?.step();
    let candidate = state.chain().last()?.offset(dx, dy)?;
    pruning.allows(view, candidate).then_some(candidate)
}

/// One cell before the chain's minimal end along the pursuit axis.
pub(crate) fn chain_backward(
    state: &TargetingState,
    view: &OpponentView,
    pruning: &Pruning,
) -> Option<Coord> {
    let (dx, dy) = state.axis()?.step();
    let candidate = state.chain().first()?.offset(-dx, -dy)?;
    pruning.allows(view, candidate).then_some(candidate)
}

/// Both chain ends are blocked: probe perpendicular neighbors of every chain
/// cell, best position value first.
pub(crate) fn perpendicular_probe(
    state: &TargetingState,
    view: &OpponentView,
    pruning: &Pruning,
) -> Option<Coord> {
    let axis = state.axis()?;
    let mut moves: Vec<Coord> = state
        .chain()
        .iter()
        .flat_map(|hit| {
            axis.cross_steps()
                .into_iter()
                .filter_map(|(dx, dy)| hit.offset(dx, dy))
        })
        .filter(|c| pruning.allows(view, *c))
        .collect();
    moves.sort_by_key(|c| Reverse(position_value(view, *c)));
    moves.first().copied()
}

/// Single unresolved hit: probe its orthogonal neighbors, the direction with
/// the longest open run first.
pub(crate) fn single_hit_probe_ranked(
    state: &TargetingState,
    view: &OpponentView,
    pruning: &Pruning,
) -> Option<Coord> {
    let hit = *state.chain().first()?;
    let mut blocked = view.resolved();
    if let Some(excl) = &pruning.sunk_excl {
        blocked |= *excl;
    }
    let mut steps = ORTHO_STEPS;
    steps.sort_by_key(|&(dx, dy)| {
        Reverse(match hit.offset(dx, dy) {
            Some(next) => free_run(next, (dx, dy), &blocked),
            None => 0,
        })
    });
    steps
        .iter()
        .filter_map(|&(dx, dy)| hit.offset(dx, dy))
        .find(|c| pruning.allows(view, *c))
}

/// Single unresolved hit, medium tier: probe its orthogonal neighbors in a
/// shuffled order.
pub(crate) fn single_hit_probe_shuffled<R: Rng + ?Sized>(
    state: &TargetingState,
    view: &OpponentView,
    pruning: &Pruning,
    rng: &mut R,
) -> Option<Coord> {
    let hit = *state.chain().first()?;
    let mut steps = ORTHO_STEPS;
    steps.shuffle(rng);
    steps
        .iter()
        .filter_map(|&(dx, dy)| hit.offset(dx, dy))
        .find(|c| pruning.allows(view, *c))
}

/// How promising an unresolved cell is from its surroundings: edges and
/// corners get a nudge, orthogonal confirmed hits a strong push, a cell
/// flanked by hits on both sides the strongest.
pub fn position_value(view: &OpponentView, at: Coord) -> i32 {
    if !at.in_bounds() || view.is_resolved(at) {
        return -1;
    }
    let mut value = 0;
    if at.x == 0 || at.x == BOARD_SIZE - 1 {
        value += 1;
    }
    if at.y == 0 || at.y == BOARD_SIZE - 1 {
        value += 1;
    }
    if (at.x == 0 || at.x == BOARD_SIZE - 1) && (at.y == 0 || at.y == BOARD_SIZE - 1) {
        value += 1;
    }
    for (dx, dy) in ORTHO_STEPS {
        if let Some(n) = at.offset(dx, dy) {
            if view.is_hit(n) {
                value += 5;
            } else if view.is_miss(n) {
                value -= 1;
            }
        }
    }
    for axis in [Orientation::Horizontal, Orientation::Vertical] {
        let (dx, dy) = axis.step();
        let flanked = at
            .offset(dx, dy)
            .zip(at.offset(-dx, -dy))
            .is_some_and(|(a, b)| view.is_hit(a) && view.is_hit(b));
        if flanked {
            value += 10;
        }
    }
    value
}

/// Whether no surviving ship can reach the cell: the maximal non-miss runs
/// through it fall short of the smallest surviving length on both axes.
pub fn is_isolated(view: &OpponentView, at: Coord, smallest_surviving: Option<usize>) -> bool {
    let Some(smallest) = smallest_surviving else {
        return false;
    };
    if view.is_resolved(at) {
        return false;
    }
    let misses = view.misses();
    let horizontal =
        free_run(at, (1, 0), &misses) + free_run(at, (-1, 0), &misses) - 1;
    let vertical =
        free_run(at, (0, 1), &misses) + free_run(at, (0, -1), &misses) - 1;
    horizontal < smallest && vertical < smallest
}
