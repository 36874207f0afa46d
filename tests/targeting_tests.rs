use armada_ai::{
    AiEngine, Coord, Difficulty, EngineSnapshot, Mask, OpponentView, Orientation, ShipKind,
};
use rand::{rngs::SmallRng, SeedableRng};

fn engine(difficulty: Difficulty, seed: u64) -> (AiEngine, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let engine = AiEngine::new(difficulty, &mut rng);
    (engine, rng)
}

/// Mark a confirmed hit both in the view and in the engine's feedback.
fn land_hit(engine: &mut AiEngine, view: &mut OpponentView, x: usize, y: usize) {
    view.record_hit(Coord::new(x, y));
    engine.record_shot_result(Coord::new(x, y), true);
}

fn land_miss(engine: &mut AiEngine, view: &mut OpponentView, x: usize, y: usize) {
    view.record_miss(Coord::new(x, y));
    engine.record_shot_result(Coord::new(x, y), false);
}

#[test]
fn test_single_hit_probes_orthogonal_neighbors() {
    for difficulty in [Difficulty::Medium, Difficulty::Hard] {
        let (mut engine, mut rng) = engine(difficulty, 7);
        let mut view = OpponentView::new();
        land_hit(&mut engine, &mut view, 3, 3);

        let shot = engine.choose_shot(&mut rng, &view).unwrap();
        let neighbors = [
            Coord::new(2, 3),
            Coord::new(4, 3),
            Coord::new(3, 2),
            Coord::new(3, 4),
        ];
        assert!(
            neighbors.contains(&shot),
            "{difficulty:?} probed {shot} instead of a neighbor"
        );
    }
}

#[test]
fn test_two_hits_resolve_horizontal_axis() {
    let (mut engine, _) = engine(Difficulty::Hard, 1);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 2, 2);
    land_hit(&mut engine, &mut view, 3, 2);
    assert_eq!(engine.targeting().axis(), Some(Orientation::Horizontal));
}

#[test]
fn test_two_hits_resolve_vertical_axis() {
    let (mut engine, _) = engine(Difficulty::Hard, 1);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 5, 4);
    land_hit(&mut engine, &mut view, 5, 5);
    assert_eq!(engine.targeting().axis(), Some(Orientation::Vertical));
}

#[test]
fn test_directional_chain_continues_forward_then_backward() {
    let (mut engine, mut rng) = engine(Difficulty::Hard, 3);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 2, 2);
    land_hit(&mut engine, &mut view, 3, 2);

    // Forward end of the sorted chain first.
    assert_eq!(engine.choose_shot(&mut rng, &view), Some(Coord::new(4, 2)));

    // Once the forward end is a known miss, fall back behind the chain.
    land_miss(&mut engine, &mut view, 4, 2);
    assert_eq!(engine.choose_shot(&mut rng, &view), Some(Coord::new(1, 2)));
}

#[test]
fn test_blocked_chain_probes_perpendicular() {
    let (mut engine, mut rng) = engine(Difficulty::Hard, 3);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 2, 2);
    land_hit(&mut engine, &mut view, 3, 2);
    land_miss(&mut engine, &mut view, 4, 2);
    land_miss(&mut engine, &mut view, 1, 2);

    let shot = engine.choose_shot(&mut rng, &view).unwrap();
    let perpendicular = [
        Coord::new(2, 1),
        Coord::new(2, 3),
        Coord::new(3, 1),
        Coord::new(3, 3),
    ];
    assert!(
        perpendicular.contains(&shot),
        "expected a perpendicular probe, got {shot}"
    );
}

#[test]
fn test_medium_follows_chain() {
    let (mut engine, mut rng) = engine(Difficulty::Medium, 11);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 6, 6);
    land_hit(&mut engine, &mut view, 6, 7);

    let shot = engine.choose_shot(&mut rng, &view).unwrap();
    assert_eq!(shot, Coord::new(6, 8));
}

#[test]
fn test_sunk_ship_clears_chain() {
    let (mut engine, _) = engine(Difficulty::Hard, 5);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 0, 0);
    land_hit(&mut engine, &mut view, 1, 0);
    assert_eq!(engine.targeting().chain().len(), 2);

    engine.notify_ship_sunk(ShipKind::Destroyer);
    assert!(engine.targeting().hunting());
    assert!(engine.targeting().sunk().contains(ShipKind::Destroyer));
    assert_eq!(engine.targeting().axis(), None);
}

#[test]
fn test_no_shots_beside_sunk_ships() {
    let (mut engine, mut rng) = engine(Difficulty::Hard, 13);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 4, 4);
    land_hit(&mut engine, &mut view, 5, 4);

    let cells = Mask::from_cells([Coord::new(4, 4), Coord::new(5, 4)]);
    view.reveal_sunk(ShipKind::Destroyer, cells);
    engine.notify_ship_sunk(ShipKind::Destroyer);
    let forbidden = cells.dilate8();

    for _ in 0..30 {
        let shot = match engine.choose_shot(&mut rng, &view) {
            Some(at) => at,
            None => break,
        };
        assert!(
            !forbidden.get(shot),
            "shot {shot} lands beside the sunk destroyer"
        );
        land_miss(&mut engine, &mut view, shot.x, shot.y);
    }
}

#[test]
fn test_snapshot_roundtrip() {
    let (mut engine, _) = engine(Difficulty::Hard, 17);
    let mut view = OpponentView::new();
    land_hit(&mut engine, &mut view, 2, 2);
    land_hit(&mut engine, &mut view, 3, 2);
    engine.notify_ship_sunk(ShipKind::Carrier);

    let snapshot = engine.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: EngineSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, snapshot);

    let restored = AiEngine::restore(decoded);
    assert_eq!(restored.targeting(), engine.targeting());
    assert_eq!(restored.difficulty(), engine.difficulty());
}
