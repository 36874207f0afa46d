//! Fleet boards and the engine's partial view of the enemy board.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::BOARD_SIZE;
use crate::grid::{Coord, Mask};
use crate::placement::FleetLayout;
use crate::ship::{Orientation, Placement, ShipKind};

/// What a shot at a fleet board produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Miss,
    Hit,
    /// The shot hit and completed the named ship.
    Sunk(ShipKind),
}

/// Errors returned by fleet board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate lies outside the grid.
    OutOfBounds { x: usize, y: usize },
    /// The cell has already been fired at.
    AlreadyResolved { x: usize, y: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds { x, y } => {
                write!(f, "coordinate ({x}, {y}) is outside the board")
            }
            BoardError::AlreadyResolved { x, y } => {
                write!(f, "cell ({x}, {y}) was already fired at")
            }
        }
    }
}

impl std::error::Error for BoardError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PlacedShip {
    placement: Placement,
    hits: Mask,
}

/// A fleet under fire: ship placements plus incoming shot history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetBoard {
    ships: [Option<PlacedShip>; ShipKind::COUNT],
    occupied: Mask,
    hits: Mask,
    misses: Mask,
}

impl FleetBoard {
    pub fn from_layout(layout: &FleetLayout) -> Self {
        let mut ships = [None; ShipKind::COUNT];
        let mut occupied = Mask::empty();
        for placement in layout.placements() {
            occupied |= placement.mask();
            ships[placement.kind().index()] = Some(PlacedShip {
                placement,
                hits: Mask::empty(),
            });
        }
        FleetBoard {
            ships,
            occupied,
            hits: Mask::empty(),
            misses: Mask::empty(),
        }
    }

    pub fn occupied(&self) -> Mask {
        self.occupied
    }

    /// Cells of a placed ship, `None` when the ship never made it onto the
    /// board.
    pub fn cells_of(&self, kind: ShipKind) -> Option<Mask> {
        self.ships[kind.index()].map(|s| s.placement.mask())
    }

    pub fn all_sunk(&self) -> bool {
        self.ships
            .iter()
            .flatten()
            .all(|s| s.hits.count() == s.placement.kind().length())
    }

    /// Resolve an incoming shot, recording it on the board.
    pub fn fire_at(&mut self, at: Coord) -> Result<ShotOutcome, BoardError> {
        if !at.in_bounds() {
            return Err(BoardError::OutOfBounds { x: at.x, y: at.y });
        }
        if self.hits.get(at) || self.misses.get(at) {
            return Err(BoardError::AlreadyResolved { x: at.x, y: at.y });
        }
        if !self.occupied.get(at) {
            self.misses.set(at);
            return Ok(ShotOutcome::Miss);
        }
        self.hits.set(at);
        for slot in self.ships.iter_mut().flatten() {
            if slot.placement.mask().get(at) {
                slot.hits.set(at);
                if slot.hits.count() == slot.placement.kind().length() {
                    return Ok(ShotOutcome::Sunk(slot.placement.kind()));
                }
                break;
            }
        }
        Ok(ShotOutcome::Hit)
    }

    /// Dominant axis of the placed fleet, `None` when neither orientation
    /// clearly leads. Exposed for layout diagnostics.
    pub fn dominant_axis(&self) -> Option<Orientation> {
        let occ = self.occupied;
        let mut horizontal = 0usize;
        let mut vertical = 0usize;
        for c in occ.iter() {
            if c.offset(1, 0).is_some_and(|e| occ.get(e)) {
                horizontal += 1;
            }
            if c.offset(0, 1).is_some_and(|s| occ.get(s)) {
                vertical += 1;
            }
        }
        if 2 * horizontal > 3 * vertical {
            Some(Orientation::Horizontal)
        } else if 2 * vertical > 3 * horizontal {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }
}

impl fmt::Display for FleetBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let c = Coord::new(x, y);
                let glyph = if self.hits.get(c) {
                    'X'
                } else if self.misses.get(c) {
                    'o'
                } else if self.occupied.get(c) {
                    '■'
                } else {
                    '·'
                };
                write!(f, "{} ", glyph)?;
            }
            if y + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// The engine's knowledge of the enemy board: shot outcomes and revealed
/// sunk ships, never unrevealed positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    hits: Mask,
    misses: Mask,
    sunk: [Mask; ShipKind::COUNT],
}

impl OpponentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self, at: Coord) {
        self.hits.set(at);
    }

    pub fn record_miss(&mut self, at: Coord) {
        self.misses.set(at);
    }

    /// Attribute revealed cells to a sunk ship. The cells are also marked as
    /// hits, so a view stays consistent even when fed reveals alone.
    pub fn reveal_sunk(&mut self, kind: ShipKind, cells: Mask) {
        self.sunk[kind.index()] |= cells;
        self.hits |= cells;
    }

    pub fn is_hit(&self, at: Coord) -> bool {
        self.hits.get(at)
    }

    pub fn is_miss(&self, at: Coord) -> bool {
        self.misses.get(at)
    }

    /// Whether the cell has been fired at, either way.
    pub fn is_resolved(&self, at: Coord) -> bool {
        self.hits.get(at) || self.misses.get(at)
    }

    pub fn hits(&self) -> Mask {
        self.hits
    }

    pub fn misses(&self) -> Mask {
        self.misses
    }

    pub fn resolved(&self) -> Mask {
        self.hits | self.misses
    }

    pub fn unresolved(&self) -> Mask {
        !(self.hits | self.misses)
    }

    /// Revealed cells of all sunk ships.
    pub fn sunk_cells(&self) -> Mask {
        self.sunk
            .iter()
            .fold(Mask::empty(), |acc, m| acc | *m)
    }

    /// Cells that cannot hold a ship because a sunk ship is within one cell,
    /// diagonals included.
    pub fn sunk_exclusion(&self) -> Mask {
        self.sunk_cells().dilate8()
    }
}

impl fmt::Display for OpponentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sunk = self.sunk_cells();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let c = Coord::new(x, y);
                let glyph = if sunk.get(c) {
                    '#'
                } else if self.hits.get(c) {
                    'X'
                } else if self.misses.get(c) {
                    'o'
                } else {
                    '·'
                };
                write!(f, "{} ", glyph)?;
            }
            if y + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
