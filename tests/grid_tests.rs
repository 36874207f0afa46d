use armada_ai::{free_run, Coord, Mask};

#[test]
fn test_set_get_count() {
    let mut mask = Mask::empty();
    assert!(mask.is_empty());

    mask.set(Coord::new(1, 1));
    assert!(mask.get(Coord::new(1, 1)));
    assert!(!mask.get(Coord::new(1, 2)));

    mask.set(Coord::new(9, 9));
    assert_eq!(mask.count(), 2);
}

#[test]
fn test_out_of_bounds_never_in_set() {
    let mask = !Mask::empty();
    assert_eq!(mask.count(), 100);
    assert!(!mask.get(Coord::new(10, 0)));
    assert!(!mask.get(Coord::new(0, 10)));
}

#[test]
fn test_iter_row_major() {
    let mask = Mask::from_cells([Coord::new(3, 0), Coord::new(0, 1), Coord::new(9, 0)]);
    let cells: Vec<Coord> = mask.iter().collect();
    assert_eq!(
        cells,
        vec![Coord::new(3, 0), Coord::new(9, 0), Coord::new(0, 1)]
    );
}

#[test]
fn test_dilate8_center() {
    let mask = Mask::from_cells([Coord::new(5, 5)]);
    let grown = mask.dilate8();
    assert_eq!(grown.count(), 9);
    assert!(grown.get(Coord::new(4, 4)));
    assert!(grown.get(Coord::new(6, 6)));
    assert!(grown.get(Coord::new(5, 5)));
}

#[test]
fn test_dilate8_corner_does_not_wrap() {
    let mask = Mask::from_cells([Coord::new(9, 0)]);
    let grown = mask.dilate8();
    // (9,0) grows only to (8,0), (8,1), (9,1) and itself.
    assert_eq!(grown.count(), 4);
    assert!(!grown.get(Coord::new(0, 0)));
    assert!(!grown.get(Coord::new(0, 1)));
}

#[test]
fn test_free_run_stops_at_blocks_and_edges() {
    let blocked = Mask::from_cells([Coord::new(4, 2)]);
    assert_eq!(free_run(Coord::new(0, 2), (1, 0), &blocked), 4);
    assert_eq!(free_run(Coord::new(5, 2), (1, 0), &blocked), 5);
    assert_eq!(free_run(Coord::new(4, 2), (1, 0), &blocked), 0);
    assert_eq!(free_run(Coord::new(3, 9), (0, 1), &Mask::empty()), 1);
}

#[test]
fn test_parity_classes() {
    assert_eq!(Coord::new(0, 0).parity(), 0);
    assert_eq!(Coord::new(3, 4).parity(), 1);
    assert_eq!(Coord::new(7, 7).parity(), 0);
}
