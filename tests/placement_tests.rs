use evhub::core::placement::cluster_regions;
use evhub::{place_hubs_baseline, place_hubs_smart, place_hubs_smart_with, Coordinate, KMeansConfig, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn scattered_regions(count: usize, seed: u64) -> Vec<Region> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            Region::new(
                format!("region_{i}"),
                Coordinate::new(rng.gen_range(0.0..8_000.0), rng.gen_range(0.0..6_000.0)),
                rng.gen_range(0.0..20.0),
                rng.gen_range(100.0..5_000.0),
            )
        })
        .collect()
}

#[test]
fn smart_placement_is_bit_identical_for_equal_seeds() {
    let regions = scattered_regions(120, 1);
    let first = place_hubs_smart(&regions, 10, 42).unwrap();
    let second = place_hubs_smart(&regions, 10, 42).unwrap();

    let bits = |hubs: &[Coordinate]| -> Vec<(u64, u64)> {
        hubs.iter().map(|h| (h.x.to_bits(), h.y.to_bits())).collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn baseline_placement_is_repeatable_and_seed_sensitive() {
    let regions = scattered_regions(80, 2);
    let a = place_hubs_baseline(&regions, 12, 7).unwrap();
    let b = place_hubs_baseline(&regions, 12, 7).unwrap();
    assert_eq!(a, b);

    let differs = (8..20).any(|seed| place_hubs_baseline(&regions, 12, seed).unwrap() != a);
    assert!(differs);
}

#[test]
fn hub_count_equal_to_region_count_works_for_both_strategies() {
    let regions = scattered_regions(9, 3);
    let centroids: Vec<Coordinate> = regions.iter().map(|r| *r.get_centroid()).collect();

    let smart = place_hubs_smart(&regions, regions.len(), 5).unwrap();
    assert_eq!(smart.len(), regions.len());
    for centroid in &centroids {
        assert!(
            smart.iter().any(|h| h.distance_to(centroid) < 1e-9),
            "no smart hub on {:?}",
            centroid
        );
    }

    let baseline = place_hubs_baseline(&regions, regions.len(), 5).unwrap();
    assert_eq!(baseline, centroids);
}

#[test]
fn raising_one_weight_pulls_its_nearest_hub_closer() {
    let mut regions = scattered_regions(60, 4);
    let target = *regions[17].get_centroid();

    let nearest_gap = |regions: &[Region]| -> f64 {
        place_hubs_smart(regions, 4, 11)
            .unwrap()
            .iter()
            .map(|h| h.distance_to(&target))
            .fold(f64::INFINITY, f64::min)
    };

    let before = nearest_gap(&regions);
    regions[17] = Region::new("region_17", target, 100_000.0, 1.0);
    let after = nearest_gap(&regions);

    assert!(after <= before, "before {before}, after {after}");
    assert!(after < 50.0, "hub should sit almost on the dominant region, gap {after}");
}

#[test]
fn explicit_kmeans_limits_are_honoured() {
    let regions = scattered_regions(50, 5);
    let single = KMeansConfig { n_init: 1, max_iterations: 1 };
    let outcome = cluster_regions(&regions, 5, 3, &single).unwrap();
    assert_eq!(outcome.iterations, 1);

    let hubs = place_hubs_smart_with(&regions, 5, 3, &KMeansConfig::default()).unwrap();
    assert_eq!(hubs.len(), 5);
}

#[test]
fn more_restarts_never_worsen_inertia() {
    let regions = scattered_regions(150, 6);
    let one = cluster_regions(&regions, 8, 9, &KMeansConfig { n_init: 1, max_iterations: 300 }).unwrap();
    let ten = cluster_regions(&regions, 8, 9, &KMeansConfig { n_init: 10, max_iterations: 300 }).unwrap();
    assert!(ten.inertia <= one.inertia);
}
