use armada_ai::{
    BoardError, Coord, FleetBoard, FleetLayout, Mask, OpponentView, Orientation, Placement,
    ShipKind, ShotOutcome,
};

fn must_place(kind: ShipKind, orientation: Orientation, x: usize, y: usize) -> Placement {
    match Placement::new(kind, orientation, Coord::new(x, y)) {
        Some(p) => p,
        None => panic!("placement off board"),
    }
}

fn small_fleet() -> FleetBoard {
    let layout = FleetLayout::from_placements([
        must_place(ShipKind::Destroyer, Orientation::Horizontal, 0, 0),
        must_place(ShipKind::Cruiser, Orientation::Vertical, 5, 5),
    ]);
    FleetBoard::from_layout(&layout)
}

#[test]
fn test_fire_at_misses_and_hits() {
    let mut board = small_fleet();
    assert_eq!(board.fire_at(Coord::new(9, 9)), Ok(ShotOutcome::Miss));
    assert_eq!(board.fire_at(Coord::new(0, 0)), Ok(ShotOutcome::Hit));
    assert_eq!(
        board.fire_at(Coord::new(1, 0)),
        Ok(ShotOutcome::Sunk(ShipKind::Destroyer))
    );
    assert!(!board.all_sunk());

    for y in 5..8 {
        let _ = board.fire_at(Coord::new(5, y));
    }
    assert!(board.all_sunk());
}

#[test]
fn test_fire_at_rejects_repeats_and_out_of_bounds() {
    let mut board = small_fleet();
    assert_eq!(board.fire_at(Coord::new(3, 3)), Ok(ShotOutcome::Miss));
    assert_eq!(
        board.fire_at(Coord::new(3, 3)),
        Err(BoardError::AlreadyResolved { x: 3, y: 3 })
    );
    assert_eq!(
        board.fire_at(Coord::new(10, 3)),
        Err(BoardError::OutOfBounds { x: 10, y: 3 })
    );
}

#[test]
fn test_cells_of_reports_placed_ships_only() {
    let board = small_fleet();
    let destroyer = board.cells_of(ShipKind::Destroyer).unwrap();
    assert_eq!(destroyer.count(), 2);
    assert!(destroyer.get(Coord::new(0, 0)));
    assert!(destroyer.get(Coord::new(1, 0)));
    assert!(board.cells_of(ShipKind::Carrier).is_none());
}

#[test]
fn test_dominant_axis_census() {
    let horizontal = FleetLayout::from_placements([
        must_place(ShipKind::Carrier, Orientation::Horizontal, 0, 0),
        must_place(ShipKind::Battleship, Orientation::Horizontal, 0, 2),
        must_place(ShipKind::Cruiser, Orientation::Horizontal, 0, 4),
    ]);
    let board = FleetBoard::from_layout(&horizontal);
    assert_eq!(board.dominant_axis(), Some(Orientation::Horizontal));

    let mixed = FleetLayout::from_placements([
        must_place(ShipKind::Cruiser, Orientation::Horizontal, 0, 0),
        must_place(ShipKind::Submarine, Orientation::Vertical, 7, 5),
    ]);
    let board = FleetBoard::from_layout(&mixed);
    assert_eq!(board.dominant_axis(), None);
}

#[test]
fn test_view_tracks_shots_and_sunk_exclusion() {
    let mut view = OpponentView::new();
    assert!(!view.is_resolved(Coord::new(4, 4)));
    view.record_hit(Coord::new(4, 4));
    view.record_miss(Coord::new(6, 6));
    assert!(view.is_hit(Coord::new(4, 4)));
    assert!(view.is_miss(Coord::new(6, 6)));
    assert_eq!(view.unresolved().count(), 98);

    let cells = Mask::from_cells([Coord::new(4, 4), Coord::new(5, 4)]);
    view.reveal_sunk(ShipKind::Destroyer, cells);
    // Reveals imply hits even if only the reveal was fed in.
    assert!(view.is_hit(Coord::new(5, 4)));

    let exclusion = view.sunk_exclusion();
    assert!(exclusion.get(Coord::new(3, 3)));
    assert!(exclusion.get(Coord::new(6, 5)));
    assert!(!exclusion.get(Coord::new(7, 4)));
}
