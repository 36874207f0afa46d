//! The fixed five-ship fleet catalogue and ship placement geometry.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BOARD_SIZE;
use crate::grid::{Coord, Mask};

/// The five ship classes of the standard fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipKind {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipKind {
    pub const COUNT: usize = 5;

    pub const fn length(self) -> usize {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Battleship => 4,
            ShipKind::Cruiser => 3,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShipKind::Carrier => "carrier",
            ShipKind::Battleship => "battleship",
            ShipKind::Cruiser => "cruiser",
            ShipKind::Submarine => "submarine",
            ShipKind::Destroyer => "destroyer",
        }
    }

    /// Stable slot index, used for per-kind arrays and bit sets.
    pub const fn index(self) -> usize {
        match self {
            ShipKind::Carrier => 0,
            ShipKind::Battleship => 1,
            ShipKind::Cruiser => 2,
            ShipKind::Submarine => 3,
            ShipKind::Destroyer => 4,
        }
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full fleet, largest ship first.
pub const FLEET: [ShipKind; ShipKind::COUNT] = [
    ShipKind::Carrier,
    ShipKind::Battleship,
    ShipKind::Cruiser,
    ShipKind::Submarine,
    ShipKind::Destroyer,
];

/// Total cells occupied by a fully placed fleet.
pub const TOTAL_FLEET_CELLS: usize = 17;

/// Axis a ship lies on, also used for the tracked hit-chain direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Unit step along the axis.
    pub const fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }

    /// The two unit steps perpendicular to the axis.
    pub const fn cross_steps(self) -> [(isize, isize); 2] {
        match self {
            Orientation::Horizontal => [(0, 1), (0, -1)],
            Orientation::Vertical => [(1, 0), (-1, 0)],
        }
    }
}

/// A ship resting on a contiguous run of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    kind: ShipKind,
    orientation: Orientation,
    origin: Coord,
}

impl Placement {
    /// Build a placement, `None` when any cell would leave the board.
    pub fn new(kind: ShipKind, orientation: Orientation, origin: Coord) -> Option<Self> {
        if !origin.in_bounds() {
            return None;
        }
        let span = origin.offset(
            match orientation {
                Orientation::Horizontal => (kind.length() - 1) as isize,
                Orientation::Vertical => 0,
            },
            match orientation {
                Orientation::Horizontal => 0,
                Orientation::Vertical => (kind.length() - 1) as isize,
            },
        );
        span.map(|_| Placement {
            kind,
            orientation,
            origin,
        })
    }

    pub fn kind(self) -> ShipKind {
        self.kind
    }

    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    pub fn origin(self) -> Coord {
        self.origin
    }

    /// Cells the ship occupies, bow to stern.
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        let (dx, dy) = self.orientation.step();
        let origin = self.origin;
        (0..self.kind.length())
            .filter_map(move |i| origin.offset(dx * i as isize, dy * i as isize))
    }

    /// Occupancy mask of the ship.
    pub fn mask(self) -> Mask {
        Mask::from_cells(self.cells())
    }

    /// Uniform bound on valid origins along the given axis.
    pub const fn max_origin(kind: ShipKind, orientation: Orientation) -> (usize, usize) {
        let reach = BOARD_SIZE - kind.length();
        match orientation {
            Orientation::Horizontal => (reach, BOARD_SIZE - 1),
            Orientation::Vertical => (BOARD_SIZE - 1, reach),
        }
    }
}

/// A small set of ship kinds, used to track which enemy ships are sunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipSet {
    bits: u8,
}

impl ShipSet {
    pub const fn empty() -> Self {
        ShipSet { bits: 0 }
    }

    pub fn insert(&mut self, kind: ShipKind) {
        self.bits |= 1 << kind.index();
    }

    pub const fn contains(self, kind: ShipKind) -> bool {
        self.bits & (1 << kind.index()) != 0
    }

    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Raw bit pattern, used for cache signatures.
    pub const fn bits(self) -> u8 {
        self.bits
    }

    pub fn iter(self) -> impl Iterator<Item = ShipKind> {
        FLEET.into_iter().filter(move |k| self.contains(*k))
    }
}

/// Lengths of the enemy ships not yet confirmed sunk.
pub fn surviving_sizes(sunk: ShipSet) -> Vec<usize> {
    FLEET
        .iter()
        .filter(|k| !sunk.contains(**k))
        .map(|k| k.length())
        .collect()
}
