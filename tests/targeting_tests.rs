use broadside::{
    place, place_fleet_randomly, AttackResult, GameError, Grid, IllegalCommand, Mode, Orientation,
    TargetingAi, TOTAL_SHIP_CELLS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn sorted(coords: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut v = coords.to_vec();
    v.sort();
    v
}

#[test]
fn test_starts_in_random_mode() {
    let ai = TargetingAi::new();
    assert_eq!(ai.mode(), Mode::Random);
    assert!(ai.target_queue().is_empty());
    assert_eq!(ai.hunted_ship(), None);
    assert_eq!(ai.orientation(), None);
}

#[test]
fn test_miss_keeps_random_mode() {
    let mut grid = Grid::new();
    let mut ai = TargetingAi::new();
    let shot = ai.fire_at(&mut grid, (5, 5)).unwrap();
    assert_eq!(shot.result, AttackResult::Miss);
    assert_eq!(ai.mode(), Mode::Random);
    assert!(ai.target_queue().is_empty());
}

#[test]
fn test_first_hit_enters_hunt_with_neighbors() {
    let mut grid = Grid::new();
    place(&mut grid, 2, 2, 3, Orientation::Horizontal, 2).unwrap();
    let mut ai = TargetingAi::new();

    let shot = ai.fire_at(&mut grid, (2, 2)).unwrap();
    assert_eq!(shot.result, AttackResult::Hit { ship_id: 2 });
    assert_eq!(ai.mode(), Mode::Hunt);
    assert_eq!(ai.hunted_ship(), Some(2));
    assert_eq!(ai.hit_chain(), &[(2, 2)]);
    assert_eq!(
        sorted(ai.target_queue()),
        vec![(1, 2), (2, 1), (2, 3), (3, 2)]
    );
}

#[test]
fn test_corner_hit_only_queues_in_bounds_neighbors() {
    let mut grid = Grid::new();
    place(&mut grid, 0, 0, 2, Orientation::Vertical, 4).unwrap();
    grid.attack(0, 1).unwrap();
    let mut ai = TargetingAi::new();

    ai.fire_at(&mut grid, (0, 0)).unwrap();
    assert_eq!(ai.target_queue(), &[(1, 0)]);
}

#[test]
fn test_two_hits_in_a_row_lock_horizontal() {
    let mut grid = Grid::new();
    place(&mut grid, 4, 2, 5, Orientation::Horizontal, 0).unwrap();
    let mut ai = TargetingAi::new();

    ai.fire_at(&mut grid, (4, 3)).unwrap();
    assert_eq!(ai.orientation(), None);
    ai.fire_at(&mut grid, (4, 5)).unwrap();

    assert_eq!(ai.orientation(), Some(Orientation::Horizontal));
    assert_eq!(sorted(ai.target_queue()), vec![(4, 2), (4, 6)]);

    let mut rng = SmallRng::seed_from_u64(1);
    let shot = ai.attack(&mut grid, &mut rng).unwrap();
    assert!(matches!((shot.row, shot.col), (4, 2) | (4, 6)));
}

#[test]
fn test_two_hits_in_a_column_lock_vertical() {
    let mut grid = Grid::new();
    place(&mut grid, 3, 7, 3, Orientation::Vertical, 3).unwrap();
    let mut ai = TargetingAi::new();

    ai.fire_at(&mut grid, (4, 7)).unwrap();
    ai.fire_at(&mut grid, (5, 7)).unwrap();

    assert_eq!(ai.orientation(), Some(Orientation::Vertical));
    assert_eq!(sorted(ai.target_queue()), vec![(3, 7), (6, 7)]);
}

#[test]
fn test_hit_on_other_ship_is_deferred() {
    let mut grid = Grid::new();
    place(&mut grid, 0, 0, 5, Orientation::Horizontal, 0).unwrap();
    place(&mut grid, 1, 0, 4, Orientation::Horizontal, 1).unwrap();
    let mut ai = TargetingAi::new();

    ai.fire_at(&mut grid, (0, 0)).unwrap();
    let shot = ai.fire_at(&mut grid, (1, 0)).unwrap();

    assert_eq!(shot.result, AttackResult::Hit { ship_id: 1 });
    assert_eq!(ai.hunted_ship(), Some(0));
    assert_eq!(ai.hit_chain(), &[(0, 0)]);
    assert_eq!(ai.pending_hits(), &[(1, 0)]);
}

#[test]
fn test_resumes_deferred_ship_after_sinking() {
    let mut grid = Grid::new();
    place(&mut grid, 0, 0, 5, Orientation::Horizontal, 0).unwrap();
    place(&mut grid, 1, 0, 4, Orientation::Horizontal, 1).unwrap();
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(5);

    ai.fire_at(&mut grid, (0, 0)).unwrap();
    ai.fire_at(&mut grid, (1, 0)).unwrap();

    // remaining carrier cells are (0, 1)..(0, 4), all reached by hunting
    for _ in 0..4 {
        let shot = ai.attack(&mut grid, &mut rng).unwrap();
        assert!(shot.result.is_hit());
    }
    assert!(grid.is_fleet_destroyed(0));
    assert_eq!(ai.mode(), Mode::Hunt);
    assert_eq!(ai.hunted_ship(), Some(1));
    assert!(ai.pending_hits().is_empty());

    for _ in 0..3 {
        ai.attack(&mut grid, &mut rng).unwrap();
    }
    assert!(grid.is_fleet_destroyed(1));
    assert_eq!(ai.mode(), Mode::Random);
    assert_eq!(ai.hunted_ship(), None);
}

#[test]
fn test_most_recent_deferred_hit_resumed_first() {
    let mut grid = Grid::new();
    place(&mut grid, 0, 0, 5, Orientation::Horizontal, 0).unwrap();
    place(&mut grid, 2, 0, 4, Orientation::Horizontal, 1).unwrap();
    place(&mut grid, 4, 0, 3, Orientation::Horizontal, 2).unwrap();
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(3);

    ai.fire_at(&mut grid, (0, 0)).unwrap();
    ai.fire_at(&mut grid, (2, 0)).unwrap();
    ai.fire_at(&mut grid, (4, 0)).unwrap();
    assert_eq!(ai.pending_hits(), &[(2, 0), (4, 0)]);

    for _ in 0..4 {
        ai.attack(&mut grid, &mut rng).unwrap();
    }
    assert!(grid.is_fleet_destroyed(0));
    // the cruiser was hit last, so it is hunted before the battleship
    assert_eq!(ai.hunted_ship(), Some(2));
    assert_eq!(ai.pending_hits(), &[(2, 0)]);

    for _ in 0..2 {
        ai.attack(&mut grid, &mut rng).unwrap();
    }
    assert!(grid.is_fleet_destroyed(2));
    assert_eq!(ai.hunted_ship(), Some(1));
    assert!(ai.pending_hits().is_empty());
}

#[test]
fn test_skips_queued_cell_attacked_elsewhere() {
    let mut grid = Grid::new();
    place(&mut grid, 5, 3, 3, Orientation::Horizontal, 2).unwrap();
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(4);

    ai.fire_at(&mut grid, (5, 5)).unwrap();
    assert_eq!(ai.target_queue().last(), Some(&(5, 6)));
    grid.attack(5, 6).unwrap();

    let shot = ai.attack(&mut grid, &mut rng).unwrap();
    assert_eq!((shot.row, shot.col), (5, 4));
    assert_eq!(shot.result, AttackResult::Hit { ship_id: 2 });
    assert_eq!(ai.mode(), Mode::Hunt);
    assert!(!ai.target_queue().contains(&(5, 6)));
}

#[test]
fn test_fills_gap_inside_known_run() {
    let mut grid = Grid::new();
    place(&mut grid, 4, 1, 5, Orientation::Horizontal, 0).unwrap();
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(9);

    ai.fire_at(&mut grid, (4, 3)).unwrap();
    ai.fire_at(&mut grid, (4, 5)).unwrap();
    for _ in 0..5 {
        ai.attack(&mut grid, &mut rng).unwrap();
    }
    assert!(grid.is_fleet_destroyed(0));
    assert_eq!(ai.mode(), Mode::Random);
}

#[test]
fn test_sinking_returns_to_random() {
    let mut grid = Grid::new();
    place(&mut grid, 8, 8, 2, Orientation::Horizontal, 4).unwrap();
    let mut ai = TargetingAi::new();

    ai.fire_at(&mut grid, (8, 8)).unwrap();
    let shot = ai.fire_at(&mut grid, (8, 9)).unwrap();
    assert_eq!(shot.result, AttackResult::Sink { ship_id: 4 });
    assert_eq!(ai.mode(), Mode::Random);
    assert!(ai.target_queue().is_empty());
    assert!(ai.hit_chain().is_empty());
}

#[test]
fn test_reattack_rejected_without_state_change() {
    let mut grid = Grid::new();
    place(&mut grid, 2, 2, 3, Orientation::Horizontal, 2).unwrap();
    let mut ai = TargetingAi::new();
    ai.fire_at(&mut grid, (2, 2)).unwrap();

    let ai_before = ai.clone();
    let grid_before = grid.clone();
    assert_eq!(
        ai.fire_at(&mut grid, (2, 2)).unwrap_err(),
        GameError::IllegalCommand(IllegalCommand::AlreadyAttacked)
    );
    assert_eq!(ai, ai_before);
    assert_eq!(grid, grid_before);
}

#[test]
fn test_no_targets_left() {
    let mut grid = Grid::new();
    for r in 0..10 {
        for c in 0..10 {
            grid.attack(r, c).unwrap();
        }
    }
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(
        ai.attack(&mut grid, &mut rng).unwrap_err(),
        GameError::IllegalCommand(IllegalCommand::NoTargetsRemaining)
    );
}

#[test]
fn test_finds_last_open_cell() {
    let mut grid = Grid::new();
    for r in 0..10 {
        for c in 0..10 {
            if (r, c) != (6, 3) {
                grid.attack(r, c).unwrap();
            }
        }
    }
    let mut ai = TargetingAi::new();
    let mut rng = SmallRng::seed_from_u64(0);
    let shot = ai.attack(&mut grid, &mut rng).unwrap();
    assert_eq!((shot.row, shot.col), (6, 3));
}

#[test]
fn test_sinks_random_fleets_without_repeats() {
    for seed in 0..50u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = Grid::new();
        place_fleet_randomly(&mut grid, &mut rng).unwrap();
        let mut ai = TargetingAi::new();

        let mut shots = 0;
        while grid.hit_count() < TOTAL_SHIP_CELLS {
            ai.attack(&mut grid, &mut rng).unwrap();
            shots += 1;
            assert!(shots <= 100, "seed {} took too many shots", seed);
        }
        assert_eq!(grid.attacked_mask().count_ones(), shots);
    }
}
