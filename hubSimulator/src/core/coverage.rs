use serde::{Deserialize, Serialize};

use crate::config::constants::{DEFAULT_COVERAGE, PERCENT_SCALE};
use crate::core::error::PlacementError;
use crate::core::placement::validate_regions;
use crate::data::poi::{HubLocation, POI};
use crate::models::region::Region;
use crate::utils::logging::{self, OperationCategory};
use crate::utils::spatial_index::SpatialIndex;

/// Coverage of one hub set over one region table. Pure value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub served_mask: Vec<bool>,
    /// Demand-weighted served share, 0..=100.
    pub avg_coverage: f64,
    pub neighborhoods_served: usize,
    /// Demand-weighted served share, 0..=1.
    pub demand_satisfied: f64,
    /// Population-weighted served share, 0..=100.
    pub population_covered: f64,
}

pub fn evaluate_coverage(
    hubs: &[HubLocation],
    regions: &[Region],
    radius_meters: f64,
) -> Result<CoverageResult, PlacementError> {
    let _timing = logging::start_timing("evaluate_coverage", OperationCategory::Coverage);

    if !(radius_meters.is_finite() && radius_meters > 0.0) {
        return Err(PlacementError::invalid(
            "radius_meters",
            format!("must be a positive finite distance, got {}", radius_meters),
        ));
    }
    if hubs.is_empty() {
        return Err(PlacementError::invalid("hubs", "at least one hub is required"));
    }
    if regions.is_empty() {
        return Err(PlacementError::invalid("regions", "region table is empty"));
    }
    validate_regions(regions, "demand_weight", Region::get_demand_weight)?;
    validate_regions(regions, "population_weight", Region::get_population_weight)?;
    if let Some(position) = hubs.iter().position(|hub| !hub.is_finite()) {
        return Err(PlacementError::invalid(
            "hubs",
            format!("hub {} has a non-finite coordinate", position),
        ));
    }

    let index = SpatialIndex::new(hubs);
    let served_mask: Vec<bool> = regions
        .iter()
        .map(|region| index.any_within(region.get_coordinate(), radius_meters))
        .collect();

    let mut neighborhoods_served = 0;
    let mut total_demand = 0.0;
    let mut served_demand = 0.0;
    let mut total_population = 0.0;
    let mut served_population = 0.0;

    for (region, served) in regions.iter().zip(&served_mask) {
        total_demand += region.get_demand_weight();
        total_population += region.get_population_weight();
        if *served {
            neighborhoods_served += 1;
            served_demand += region.get_demand_weight();
            served_population += region.get_population_weight();
        }
    }

    let demand_satisfied = weighted_share(served_demand, total_demand);
    let population_share = weighted_share(served_population, total_population);

    Ok(CoverageResult {
        served_mask,
        avg_coverage: demand_satisfied * PERCENT_SCALE,
        neighborhoods_served,
        demand_satisfied,
        population_covered: population_share * PERCENT_SCALE,
    })
}

// Weights are validated non-negative, so served <= total holds.
fn weighted_share(served: f64, total: f64) -> f64 {
    if total > 0.0 {
        served / total
    } else {
        DEFAULT_COVERAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::Coordinate;

    fn region(id: &str, x: f64, y: f64, demand: f64, population: f64) -> Region {
        Region::new(id, Coordinate::new(x, y), demand, population)
    }

    #[test]
    fn counts_and_weights_served_regions() {
        let regions = vec![
            region("a", 0.0, 0.0, 2.0, 10.0),
            region("b", 400.0, 0.0, 6.0, 10.0),
            region("c", 2000.0, 0.0, 2.0, 20.0),
        ];
        let hubs = vec![Coordinate::new(100.0, 0.0)];

        let result = evaluate_coverage(&hubs, &regions, 500.0).unwrap();
        assert_eq!(result.served_mask, vec![true, true, false]);
        assert_eq!(result.neighborhoods_served, 2);
        assert!((result.demand_satisfied - 0.8).abs() < 1e-12);
        assert!((result.avg_coverage - 80.0).abs() < 1e-9);
        assert!((result.population_covered - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_weight_region_is_still_served() {
        let regions = vec![region("a", 0.0, 0.0, 0.0, 0.0), region("b", 10_000.0, 0.0, 5.0, 1.0)];
        let hubs = vec![Coordinate::new(0.0, 0.0)];

        let result = evaluate_coverage(&hubs, &regions, 100.0).unwrap();
        assert_eq!(result.served_mask, vec![true, false]);
        assert_eq!(result.neighborhoods_served, 1);
        assert_eq!(result.demand_satisfied, 0.0);
    }

    #[test]
    fn zero_total_demand_reports_zero_share() {
        let regions = vec![region("a", 0.0, 0.0, 0.0, 0.0)];
        let hubs = vec![Coordinate::new(0.0, 0.0)];

        let result = evaluate_coverage(&hubs, &regions, 100.0).unwrap();
        assert_eq!(result.neighborhoods_served, 1);
        assert_eq!(result.avg_coverage, 0.0);
        assert_eq!(result.population_covered, 0.0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let regions = vec![region("a", 0.0, 0.0, 1.0, 1.0)];
        let hubs = vec![Coordinate::new(0.0, 0.0)];

        for radius in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = evaluate_coverage(&hubs, &regions, radius).unwrap_err();
            assert_eq!(err.parameter(), Some("radius_meters"));
        }
        assert_eq!(evaluate_coverage(&[], &regions, 10.0).unwrap_err().parameter(), Some("hubs"));
        assert_eq!(evaluate_coverage(&hubs, &[], 10.0).unwrap_err().parameter(), Some("regions"));
    }

    #[test]
    fn negative_or_nan_weight_is_rejected() {
        let hubs = vec![Coordinate::new(0.0, 0.0)];

        for bad in [-5.0, f64::NAN, f64::INFINITY] {
            let regions = vec![region("a", 0.0, 0.0, 10.0, 1.0), region("b", 9_000.0, 0.0, bad, 1.0)];
            match evaluate_coverage(&hubs, &regions, 500.0) {
                Err(PlacementError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, "demand_weight"),
                other => panic!("expected InvalidParameter for demand {}, got {:?}", bad, other),
            }

            let regions = vec![region("a", 0.0, 0.0, 1.0, 10.0), region("b", 9_000.0, 0.0, 1.0, bad)];
            let err = evaluate_coverage(&hubs, &regions, 500.0).unwrap_err();
            assert_eq!(err.parameter(), Some("population_weight"));
        }
    }

    #[test]
    fn non_finite_centroid_is_rejected() {
        let regions = vec![region("a", 0.0, 0.0, 1.0, 1.0), region("b", f64::NAN, 0.0, 1.0, 1.0)];
        let hubs = vec![Coordinate::new(0.0, 0.0)];

        let err = evaluate_coverage(&hubs, &regions, 500.0).unwrap_err();
        assert_eq!(err.parameter(), Some("regions"));
    }
}
