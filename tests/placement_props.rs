use broadside::{can_place, place, place_fleet_randomly, Grid, Orientation, SHIPS, TOTAL_SHIP_CELLS};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn run(row: usize, col: usize, len: usize, o: Orientation) -> Vec<(usize, usize)> {
    (0..len).map(|i| o.step(row, col, i)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn can_place_matches_overlap_model(
        r1 in 0..10usize, c1 in 0..10usize, l1 in 2..=5usize, o1 in orientation(),
        r2 in 0..10usize, c2 in 0..10usize, l2 in 2..=5usize, o2 in orientation(),
    ) {
        let mut grid = Grid::new();
        let first = run(r1, c1, l1, o1);
        let first_fits = first.iter().all(|&(r, c)| r < 10 && c < 10);
        prop_assert_eq!(can_place(&grid, r1, c1, l1, o1), first_fits);
        prop_assume!(first_fits);
        place(&mut grid, r1, c1, l1, o1, 0).unwrap();

        let second = run(r2, c2, l2, o2);
        let in_bounds = second.iter().all(|&(r, c)| r < 10 && c < 10);
        let disjoint = second.iter().all(|cell| !first.contains(cell));
        prop_assert_eq!(can_place(&grid, r2, c2, l2, o2), in_bounds && disjoint);
    }

    #[test]
    fn random_fleet_has_all_cells_without_overlap(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut grid = Grid::new();
        place_fleet_randomly(&mut grid, &mut rng).unwrap();
        prop_assert_eq!(grid.total_occupied_cells(), TOTAL_SHIP_CELLS);
        for ship in SHIPS.iter() {
            let mut cells = 0;
            for r in 0..10 {
                for c in 0..10 {
                    if grid.ship_at(r, c) == Some(ship.id()) {
                        cells += 1;
                    }
                }
            }
            prop_assert_eq!(cells, ship.length());
        }
    }
}
