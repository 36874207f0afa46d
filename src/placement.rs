//! Fleet placement: randomized retry with graceful degradation, plus the
//! pattern-biased strategic variant used by the hardest tier.

use log::{error, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Tuning, BOARD_SIZE, PLACEMENT_ATTEMPTS};
use crate::grid::{Coord, Mask};
use crate::ship::{Orientation, Placement, ShipKind, FLEET};

/// How candidate positions are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStyle {
    /// Uniform random positions.
    Random,
    /// Weighted mix of edge-hugging, center-region and clustered positions.
    Strategic,
}

/// Outcome of a fleet placement pass. Ships that could not be placed within
/// the attempt caps are listed in `unplaced`; play proceeds without them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetLayout {
    ships: [Option<Placement>; ShipKind::COUNT],
}

impl FleetLayout {
    /// Build a layout from explicit placements, later entries replacing
    /// earlier ones of the same kind. No separation rules are applied.
    pub fn from_placements<I>(placements: I) -> Self
    where
        I: IntoIterator<Item = Placement>,
    {
        let mut layout = FleetLayout::default();
        for p in placements {
            layout.ships[p.kind().index()] = Some(p);
        }
        layout
    }

    pub fn placement_of(&self, kind: ShipKind) -> Option<Placement> {
        self.ships[kind.index()]
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.ships.iter().flatten().copied()
    }

    pub fn unplaced(&self) -> Vec<ShipKind> {
        FLEET
            .iter()
            .copied()
            .filter(|k| self.ships[k.index()].is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.ships.iter().all(|s| s.is_some())
    }

    pub fn occupied(&self) -> Mask {
        self.placements()
            .fold(Mask::empty(), |acc, p| acc | p.mask())
    }

    /// Whether no two ships are within Chebyshev distance 1 of each other.
    /// Always holds when every ship passed the strict check.
    pub fn strictly_separated(&self) -> bool {
        let placements: Vec<Placement> = self.placements().collect();
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                if !(a.mask().dilate8() & b.mask()).is_empty() {
                    return false;
                }
            }
        }
        true
    }
}

/// No cell of the candidate within one cell of an already placed ship,
/// diagonals included.
pub fn can_place_strict(occupied: Mask, candidate: Placement) -> bool {
    (candidate.mask() & occupied.dilate8()).is_empty()
}

/// Overlap-only check, used once the strict rule has exhausted its attempts.
pub fn can_place_relaxed(occupied: Mask, candidate: Placement) -> bool {
    (candidate.mask() & occupied).is_empty()
}

/// Place the whole fleet. Always terminates; a ship that survives both
/// attempt caps unplaced is logged and skipped rather than failing the pass.
pub fn place_fleet<R: Rng + ?Sized>(
    rng: &mut R,
    style: PlacementStyle,
    tuning: &Tuning,
) -> FleetLayout {
    let mut layout = FleetLayout::default();
    let mut occupied = Mask::empty();
    let mut anchors: Vec<Placement> = Vec::new();

    for kind in FLEET {
        let strict = (0..PLACEMENT_ATTEMPTS).find_map(|_| {
            let candidate = match style {
                PlacementStyle::Random => random_candidate(rng, kind),
                PlacementStyle::Strategic => strategic_candidate(rng, kind, &anchors, tuning),
            }?;
            can_place_strict(occupied, candidate).then_some(candidate)
        });

        let placement = strict.or_else(|| {
            warn!(
                "could not place {kind} within {PLACEMENT_ATTEMPTS} attempts, relaxing adjacency rule"
            );
            (0..PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = random_candidate(rng, kind)?;
                can_place_relaxed(occupied, candidate).then_some(candidate)
            })
        });

        match placement {
            Some(p) => {
                occupied |= p.mask();
                anchors.push(p);
                layout.ships[kind.index()] = Some(p);
            }
            None => error!("failed to place {kind} even with relaxed rules, continuing without it"),
        }
    }

    layout
}

fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> Orientation {
    if rng.random() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

fn random_candidate<R: Rng + ?Sized>(rng: &mut R, kind: ShipKind) -> Option<Placement> {
    let orientation = random_orientation(rng);
    let (max_x, max_y) = Placement::max_origin(kind, orientation);
    let origin = Coord::new(
        rng.random_range(0..=max_x),
        rng.random_range(0..=max_y),
    );
    Placement::new(kind, orientation, origin)
}

fn strategic_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    kind: ShipKind,
    anchors: &[Placement],
    tuning: &Tuning,
) -> Option<Placement> {
    let weights = [
        tuning.edge_weight,
        tuning.center_weight,
        tuning.cluster_weight,
    ];
    match weighted_choice(rng, &weights) {
        2 if !anchors.is_empty() => cluster_candidate(rng, kind, anchors),
        1 => center_candidate(rng, kind),
        _ => edge_candidate(rng, kind),
    }
}

fn weighted_choice<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.random::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    0
}

/// One cell in from a border, the long axis running along it.
fn edge_candidate<R: Rng + ?Sized>(rng: &mut R, kind: ShipKind) -> Option<Placement> {
    let orientation = random_orientation(rng);
    let span = BOARD_SIZE.saturating_sub(kind.length() + 2);
    let along = 1 + if span == 0 {
        0
    } else {
        rng.random_range(0..span)
    };
    let side = if rng.random() { 1 } else { BOARD_SIZE - 2 };
    let origin = match orientation {
        Orientation::Horizontal => Coord::new(along, side),
        Orientation::Vertical => Coord::new(side, along),
    };
    Placement::new(kind, orientation, origin)
}

/// Somewhere in the middle 30–70% region of the board.
fn center_candidate<R: Rng + ?Sized>(rng: &mut R, kind: ShipKind) -> Option<Placement> {
    let min = (BOARD_SIZE as f64 * 0.3) as usize;
    let max = (BOARD_SIZE as f64 * 0.7) as usize;
    let span = (max - min + 1).saturating_sub(kind.length());
    let mut pick = |rng: &mut R| {
        min + if span == 0 {
            0
        } else {
            rng.random_range(0..span)
        }
    };
    let origin = Coord::new(pick(rng), pick(rng));
    Placement::new(kind, random_orientation(rng), origin)
}

/// Offset ±1 from the origin of a previously placed ship.
fn cluster_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    kind: ShipKind,
    anchors: &[Placement],
) -> Option<Placement> {
    let anchor = anchors[rng.random_range(0..anchors.len())].origin();
    let orientation = random_orientation(rng);
    let slide: isize = rng.random_range(-1..=1i32) as isize;
    let side: isize = if rng.random() { 1 } else { -1 };
    let (dx, dy) = match orientation {
        Orientation::Horizontal => (slide, side),
        Orientation::Vertical => (side, slide),
    };
    let origin = anchor.offset(dx, dy)?;
    Placement::new(kind, orientation, origin)
}
