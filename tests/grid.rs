use pixel_reveal::{shuffled_indices, Grid, GridSpec, MAX_CELLS};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn shuffle_is_a_permutation_for_every_size() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for n in (0..=70).chain([255, 1_024, 4_096]) {
        let order = shuffled_indices(n, &mut rng).unwrap();
        assert_eq!(order.len(), n);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert!(
            sorted.iter().enumerate().all(|(i, &v)| v as usize == i),
            "size {n} is not a permutation"
        );
    }
}

#[test]
fn shuffle_is_deterministic_for_a_seed() {
    let a = shuffled_indices(200, &mut SmallRng::seed_from_u64(42));
    let b = shuffled_indices(200, &mut SmallRng::seed_from_u64(42));
    let c = shuffled_indices(200, &mut SmallRng::seed_from_u64(43));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn shuffle_moves_every_position_over_many_runs() {
    // Each index should land first at least once across enough shuffles.
    let mut rng = SmallRng::seed_from_u64(1);
    let mut seen_first = [false; 8];
    for _ in 0..2_000 {
        seen_first[shuffled_indices(8, &mut rng).unwrap()[0] as usize] = true;
    }
    assert!(seen_first.iter().all(|&s| s));
}

#[test]
fn empty_grid_shuffles_to_nothing() {
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(shuffled_indices(Grid::EMPTY.total_cells(), &mut rng), Some(Vec::new()));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn shuffle_refuses_counts_beyond_the_index_space() {
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(shuffled_indices(u32::MAX as usize + 3, &mut rng), None);
}

#[test]
fn huge_surfaces_stay_within_the_cell_limit() {
    let grid = GridSpec::CellSize(1.0).resolve(1.0e6, 1.0e6);
    assert!(!grid.is_empty());
    assert!(grid.total_cells() <= MAX_CELLS as usize);

    let fixed = GridSpec::Fixed { cols: 70_000, rows: 70_000 }.resolve(320.0, 240.0);
    assert!(fixed.total_cells() <= MAX_CELLS as usize);

    let mut rng = SmallRng::seed_from_u64(9);
    let order = shuffled_indices(grid.total_cells(), &mut rng).unwrap();
    assert_eq!(order.len(), grid.total_cells());
}

#[test]
fn cell_size_grid_follows_surface() {
    let spec = GridSpec::CellSize(24.0);
    let grid = spec.resolve(1_280.0, 720.0);
    assert_eq!((grid.cols(), grid.rows()), (54, 30));
    assert_eq!(grid.total_cells(), 54 * 30);

    let tiny = spec.resolve(3.0, 3.0);
    assert_eq!(tiny.total_cells(), 1);
}

#[test]
fn fixed_grid_ignores_surface_size() {
    let spec = GridSpec::Fixed { cols: 12, rows: 12 };
    assert_eq!(spec.resolve(320.0, 220.0).total_cells(), 144);
    assert_eq!(spec.resolve(37.5, 1_900.0).total_cells(), 144);
}
