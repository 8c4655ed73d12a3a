use kdsearch::{build_index, distance_squared, query_nearest, BuildStrategy, Error, IndexConfig, Point};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Nearest other point by exhaustive scan: (squared distance, ids at that distance).
fn brute_force(points: &[Point], target: &Point) -> Option<(f64, Vec<usize>)> {
    let best = points
        .iter()
        .filter(|p| p.id != target.id)
        .map(|p| p.distance_squared(target))
        .fold(f64::INFINITY, f64::min);
    if best.is_infinite() {
        return None;
    }
    let ids = points
        .iter()
        .filter(|p| p.id != target.id && distance_squared(&p.vec, &target.vec) == best)
        .map(|p| p.id)
        .collect();
    Some((best, ids))
}

#[test]
fn test_reference_scenario_tie_break() {
    let points = vec![
        Point::new(0, 0, vec![0.0, 0.0]),
        Point::new(1, 1, vec![1.0, 0.0]),
        Point::new(2, 2, vec![0.0, 1.0]),
        Point::new(3, 3, vec![5.0, 5.0]),
    ];
    let index = build_index(&points, &IndexConfig::with_dimension(2)).unwrap();

    // Stable sort on x gives [id0, id2, id1, id3]: id1 is the root, id2 the
    // left child splitting on y with id0 below it, id3 the right child.
    let tree = index.tree();
    let root = tree.root().unwrap();
    assert_eq!((root.point().id, root.axis()), (1, 0));
    let left = tree.left(root).unwrap();
    assert_eq!((left.point().id, left.axis()), (2, 1));
    assert_eq!(tree.left(left).unwrap().point().id, 0);
    assert!(tree.right(left).is_none());
    let right = tree.right(root).unwrap();
    assert_eq!((right.point().id, right.axis()), (3, 1));

    // id1 is reached first at squared distance 1; id2 only ties it and id0 is the target.
    let nearest = tree.nearest(&points[0]).unwrap().unwrap();
    assert_eq!(nearest.node.point().id, 1);
    assert_eq!(nearest.distance_sq, 1.0);

    let m = query_nearest(&index, &points[0]).unwrap().unwrap();
    assert_eq!((m.id, m.label), (1, 1));
    assert!((m.distance - 1.0).abs() < 1e-12);
}

#[test]
fn test_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(2024);
    for strategy in [BuildStrategy::Sort, BuildStrategy::Select] {
        for n in [2, 3, 5, 17, 64, 128, 200] {
            let points: Vec<Point> = (0..n)
                .map(|i| {
                    let vec = (0..3).map(|_| rng.gen_range(0.0..10.0)).collect();
                    Point::new(i, 0, vec)
                })
                .collect();
            let index = build_index(&points, &IndexConfig::with_dimension(3).strategy(strategy)).unwrap();

            for target in &points {
                let (expected_sq, ids) = brute_force(&points, target).unwrap();
                let m = query_nearest(&index, target).unwrap().expect("should find a neighbour");
                assert!(
                    (m.distance - expected_sq.sqrt()).abs() < 1e-9,
                    "n = {}, target {}: got distance {}, expected {}",
                    n, target.id, m.distance, expected_sq.sqrt()
                );
                assert!(ids.contains(&m.id), "n = {}, target {}: {} is not among {:?}", n, target.id, m.id, ids);
                assert_ne!(m.id, target.id);
            }
        }
    }
}

#[test]
fn test_matches_brute_force_on_grid_with_ties() {
    // Integer lattice: many equidistant neighbours exercise the `<` pruning bound.
    let mut points = Vec::new();
    for x in 0..5 {
        for y in 0..5 {
            for z in 0..4 {
                points.push(Point::new(points.len(), 0, vec![x as f64, y as f64, z as f64]));
            }
        }
    }
    let index = build_index(&points, &IndexConfig::with_dimension(3)).unwrap();
    for target in &points {
        let (expected_sq, ids) = brute_force(&points, target).unwrap();
        let m = query_nearest(&index, target).unwrap().unwrap();
        assert!((m.distance * m.distance - expected_sq).abs() < 1e-9);
        assert!(ids.contains(&m.id));
    }
}

#[test]
fn test_external_target() {
    let mut rng = StdRng::seed_from_u64(99);
    let points: Vec<Point> = (0..150)
        .map(|i| Point::new(i, 0, (0..4).map(|_| rng.gen_range(-1.0..1.0)).collect()))
        .collect();
    let index = build_index(&points, &IndexConfig::with_dimension(4)).unwrap();

    for _ in 0..50 {
        // An id outside the batch never triggers self-exclusion.
        let target = Point::new(usize::MAX, 0, (0..4).map(|_| rng.gen_range(-1.0..1.0)).collect());
        let (expected_sq, ids) = brute_force(&points, &target).unwrap();
        let m = query_nearest(&index, &target).unwrap().unwrap();
        assert!((m.distance - expected_sq.sqrt()).abs() < 1e-9);
        assert!(ids.contains(&m.id));
    }
}

#[test]
fn test_single_point_excludes_itself() {
    let points = vec![Point::new(7, 1, vec![1.0, 2.0, 3.0])];
    let index = build_index(&points, &IndexConfig::with_dimension(3)).unwrap();
    assert!(query_nearest(&index, &points[0]).unwrap().is_none());

    // A different id at the same position is matched at distance zero.
    let other = Point::new(8, 1, vec![1.0, 2.0, 3.0]);
    let m = query_nearest(&index, &other).unwrap().unwrap();
    assert_eq!(m.id, 7);
    assert_eq!(m.distance, 0.0);
}

#[test]
fn test_duplicate_position_found_at_zero_distance() {
    let points = vec![
        Point::new(0, 0, vec![3.0, 3.0]),
        Point::new(1, 0, vec![3.0, 3.0]),
        Point::new(2, 0, vec![9.0, 9.0]),
    ];
    let index = build_index(&points, &IndexConfig::with_dimension(2)).unwrap();
    assert_eq!(query_nearest(&index, &points[0]).unwrap().unwrap().id, 1);
    assert_eq!(query_nearest(&index, &points[1]).unwrap().unwrap().id, 0);
}

#[test]
fn test_empty_index_has_no_match() {
    let index = build_index(&[], &IndexConfig::with_dimension(2)).unwrap();
    let target = Point::new(0, 0, vec![0.0, 0.0]);
    assert!(query_nearest(&index, &target).unwrap().is_none());
}

#[test]
fn test_target_dimension_mismatch() {
    let points = vec![Point::new(0, 0, vec![0.0, 0.0]), Point::new(1, 0, vec![1.0, 1.0])];
    let index = build_index(&points, &IndexConfig::with_dimension(2)).unwrap();

    for vec in [vec![0.0], vec![0.0, 0.0, 0.0], vec![]] {
        let target = Point::new(5, 0, vec);
        let found = target.dimension();
        match query_nearest(&index, &target) {
            Err(Error::InvalidDimension { expected: 2, found: f, .. }) => assert_eq!(f, found),
            other => panic!("expected InvalidDimension, got {:?}", other),
        }
    }

    // The check runs even when there is nothing to compare against.
    let empty = build_index(&[], &IndexConfig::with_dimension(2)).unwrap();
    assert!(query_nearest(&empty, &Point::new(0, 0, vec![1.0])).is_err());
}

#[test]
fn test_concurrent_queries_share_one_index() {
    let mut rng = StdRng::seed_from_u64(8);
    let points: Vec<Point> = (0..300)
        .map(|i| Point::new(i, 0, (0..8).map(|_| rng.gen_range(0.0..1.0)).collect()))
        .collect();
    let index = build_index(&points, &IndexConfig::with_dimension(8)).unwrap();

    let sequential: Vec<_> = points.iter().map(|p| index.query(p).unwrap()).collect();
    for (p, m) in points.iter().zip(&sequential) {
        assert_eq!(*m, query_nearest(&index, p).unwrap());
    }

    let parallel = index.query_batch(&points);
    assert_eq!(parallel.len(), points.len());
    for (a, b) in sequential.iter().zip(parallel) {
        assert_eq!(*a, b.unwrap());
    }

    std::thread::scope(|s| {
        for chunk in points.chunks(75) {
            let index = &index;
            let sequential = &sequential;
            s.spawn(move || {
                for p in chunk {
                    assert_eq!(query_nearest(index, p).unwrap(), sequential[p.id]);
                }
            });
        }
    });
}
