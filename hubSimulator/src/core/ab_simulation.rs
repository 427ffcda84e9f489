use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::analysis::summary::{SimulationSummary, TrialAccumulator};
use crate::config::simulation_config::SimulationConfig;
use crate::core::baseline::place_hubs_baseline;
use crate::core::coverage::{evaluate_coverage, CoverageResult};
use crate::core::error::PlacementError;
use crate::core::placement::{place_hubs_smart_with, validate_hub_count, validate_regions};
use crate::models::region::Region;
use crate::utils::logging::{self, OperationCategory};

/// Smart placement against `iterations` population-weighted baselines, run
/// sequentially with the default clustering limits.
pub fn run_ab_simulation(
    regions: &[Region],
    n_hubs: usize,
    radius_meters: f64,
    iterations: usize,
    base_seed: u64,
) -> Result<SimulationSummary, PlacementError> {
    let config = SimulationConfig {
        n_hubs,
        radius_meters,
        iterations,
        base_seed,
        ..SimulationConfig::default()
    };
    run_ab_simulation_with_config(regions, &config)
}

pub fn run_ab_simulation_with_config(
    regions: &[Region],
    config: &SimulationConfig,
) -> Result<SimulationSummary, PlacementError> {
    run_ab_simulation_with_progress(regions, config, || {})
}

/// Same as [`run_ab_simulation_with_config`], calling `on_trial` once after
/// every completed baseline trial. In parallel mode the callback runs on pool
/// threads.
#[instrument(level = "debug", skip_all, fields(n_hubs = config.n_hubs, iterations = config.iterations))]
pub fn run_ab_simulation_with_progress<F>(
    regions: &[Region],
    config: &SimulationConfig,
    on_trial: F,
) -> Result<SimulationSummary, PlacementError>
where
    F: Fn() + Sync,
{
    let _timing = logging::start_timing("run_ab_simulation", OperationCategory::Simulation);

    config.validate()?;
    validate_hub_count(regions, config.n_hubs)?;
    validate_regions(regions, "population_weight", Region::get_population_weight)?;

    let smart_hubs = place_hubs_smart_with(regions, config.n_hubs, config.base_seed, &config.kmeans)?;
    let smart_coverage = evaluate_coverage(&smart_hubs, regions, config.radius_meters)?;
    debug!(
        n_hubs = config.n_hubs,
        demand_satisfied = smart_coverage.demand_satisfied,
        "smart placement evaluated"
    );

    let totals = if config.parallel {
        (0..config.iterations)
            .into_par_iter()
            .try_fold(
                || TrialAccumulator::new(&smart_coverage),
                |mut acc, iteration| -> Result<TrialAccumulator, PlacementError> {
                    acc.push(&run_trial(regions, config, iteration)?);
                    on_trial();
                    Ok(acc)
                },
            )
            .try_reduce(|| TrialAccumulator::new(&smart_coverage), |a, b| Ok(a.merge(b)))?
    } else {
        let mut acc = TrialAccumulator::new(&smart_coverage);
        for iteration in 0..config.iterations {
            acc.push(&run_trial(regions, config, iteration)?);
            on_trial();
        }
        acc
    };

    let summary = SimulationSummary {
        n_hubs: config.n_hubs,
        radius_meters: config.radius_meters,
        iterations: totals.trials(),
        base_seed: config.base_seed,
        smart_hubs,
        smart_coverage,
        avg_coverage: totals.avg_coverage.finish(),
        neighborhoods_served: totals.neighborhoods_served.finish(),
        demand_satisfied: totals.demand_satisfied.finish(),
        population_covered: totals.population_covered.finish(),
    };

    info!(
        n_hubs = summary.n_hubs,
        iterations = summary.iterations,
        smart = summary.demand_satisfied.smart,
        baseline_mean = summary.demand_satisfied.baseline_mean,
        "A/B simulation finished"
    );
    Ok(summary)
}

/// Baseline trial `iteration`, seeded `base_seed + iteration`. Any failure is
/// wrapped with the iteration index.
fn run_trial(
    regions: &[Region],
    config: &SimulationConfig,
    iteration: usize,
) -> Result<CoverageResult, PlacementError> {
    let seed = config.base_seed.wrapping_add(iteration as u64);
    place_hubs_baseline(regions, config.n_hubs, seed)
        .and_then(|hubs| evaluate_coverage(&hubs, regions, config.radius_meters))
        .map_err(|err| PlacementError::aborted(iteration, err))
}

/// One summary per hub count in `config.scenarios`, in order. Stops at the
/// first failing scenario.
pub fn run_scenarios(
    regions: &[Region],
    config: &SimulationConfig,
) -> Result<Vec<SimulationSummary>, PlacementError> {
    if config.scenarios.is_empty() {
        return Err(PlacementError::invalid("scenarios", "at least one hub count is required"));
    }

    config
        .scenarios
        .iter()
        .map(|&n_hubs| {
            info!(n_hubs, "running scenario");
            run_ab_simulation_with_config(regions, &config.for_hub_count(n_hubs))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::Coordinate;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn clustered_regions() -> Vec<Region> {
        let mut regions = Vec::new();
        for i in 0..6 {
            let x = 3000.0 + (i % 3) as f64 * 100.0;
            let y = (i / 3) as f64 * 100.0;
            regions.push(Region::new(format!("hot{}", i), Coordinate::new(x, y), 10.0, 1.0));
        }
        for i in 0..10 {
            regions.push(Region::new(
                format!("cold{}", i),
                Coordinate::new(i as f64 * 700.0, 5000.0),
                0.5,
                3.0,
            ));
        }
        regions
    }

    #[test]
    fn counts_every_trial_and_reports_callback() {
        let regions = clustered_regions();
        let calls = AtomicUsize::new(0);
        let config = SimulationConfig {
            n_hubs: 2,
            iterations: 40,
            ..SimulationConfig::default()
        };

        let summary = run_ab_simulation_with_progress(&regions, &config, || {
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 40);
        assert_eq!(summary.iterations, 40);
        assert_eq!(summary.smart_hubs.len(), 2);
        assert!(summary.demand_satisfied.baseline_min <= summary.demand_satisfied.baseline_mean);
        assert!(summary.demand_satisfied.baseline_mean <= summary.demand_satisfied.baseline_max);
    }

    #[test]
    fn parallel_matches_sequential() {
        let regions = clustered_regions();
        let sequential = SimulationConfig {
            n_hubs: 3,
            iterations: 64,
            ..SimulationConfig::default()
        };
        let parallel = SimulationConfig { parallel: true, ..sequential.clone() };

        let a = run_ab_simulation_with_config(&regions, &sequential).unwrap();
        let b = run_ab_simulation_with_config(&regions, &parallel).unwrap();

        assert_eq!(a.smart_hubs, b.smart_hubs);
        for ((name, x), (_, y)) in a.metrics().iter().zip(b.metrics().iter()) {
            assert!((x.baseline_mean - y.baseline_mean).abs() < 1e-9, "{}", name);
            assert!((x.baseline_std - y.baseline_std).abs() < 1e-9, "{}", name);
            assert_eq!(x.baseline_min, y.baseline_min);
            assert_eq!(x.baseline_max, y.baseline_max);
            assert_eq!(x.smart_percentile, y.smart_percentile);
        }
    }

    #[test]
    fn invalid_parameters_fail_before_any_trial() {
        let regions = clustered_regions();
        let err = run_ab_simulation(&regions, 2, 500.0, 0, 1).unwrap_err();
        assert_eq!(err.parameter(), Some("iterations"));
        let err = run_ab_simulation(&regions, 2, -1.0, 10, 1).unwrap_err();
        assert_eq!(err.parameter(), Some("radius_meters"));
        let err = run_ab_simulation(&regions, 99, 500.0, 10, 1).unwrap_err();
        assert_eq!(err.parameter(), Some("n_hubs"));
    }

    #[test]
    fn scenarios_run_in_order() {
        let regions = clustered_regions();
        let config = SimulationConfig {
            scenarios: vec![3, 1, 2],
            iterations: 5,
            ..SimulationConfig::default()
        };
        let summaries = run_scenarios(&regions, &config).unwrap();
        let counts: Vec<usize> = summaries.iter().map(|s| s.n_hubs).collect();
        assert_eq!(counts, vec![3, 1, 2]);

        let too_many = SimulationConfig { scenarios: vec![2, 40], ..config };
        assert_eq!(run_scenarios(&regions, &too_many).unwrap_err().parameter(), Some("n_hubs"));
    }

    #[test]
    fn failing_trial_reports_its_iteration() {
        let mut regions = clustered_regions();
        let config = SimulationConfig { n_hubs: 2, ..SimulationConfig::default() };
        assert!(run_trial(&regions, &config, 3).is_ok());

        regions[4] = Region::new("hot4", Coordinate::new(3100.0, 100.0), -1.0, 1.0);
        let err = run_trial(&regions, &config, 7).unwrap_err();

        assert!(matches!(err, PlacementError::SimulationAborted { iteration: 7, .. }), "{:?}", err);
        assert_eq!(err.parameter(), Some("demand_weight"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("iteration 7"), "{}", err);
    }
}
