use tracing::{debug, info, warn};

use crate::config::simulation_config::KMeansConfig;
use crate::core::error::PlacementError;
use crate::core::kmeans::{ClusteringOutcome, WeightedKMeans};
use crate::data::poi::{Coordinate, HubLocation, POI};
use crate::models::region::Region;
use crate::utils::logging::{self, OperationCategory, PlacementType};

pub(crate) fn validate_hub_count(regions: &[Region], n_hubs: usize) -> Result<(), PlacementError> {
    if regions.is_empty() {
        return Err(PlacementError::invalid("regions", "region table is empty"));
    }
    if n_hubs == 0 || n_hubs > regions.len() {
        return Err(PlacementError::invalid(
            "n_hubs",
            format!("must be between 1 and {}, got {}", regions.len(), n_hubs),
        ));
    }
    Ok(())
}

/// Rejects non-finite centroids and negative or non-finite weights.
pub(crate) fn validate_regions<F>(regions: &[Region], weight_name: &'static str, weight_of: F) -> Result<(), PlacementError>
where
    F: Fn(&Region) -> f64,
{
    for region in regions {
        if !region.get_coordinate().is_finite() {
            return Err(PlacementError::invalid(
                "regions",
                format!("region '{}' has a non-finite centroid", region.get_id()),
            ));
        }
        let weight = weight_of(region);
        if !weight.is_finite() || weight < 0.0 {
            return Err(PlacementError::invalid(
                weight_name,
                format!("region '{}' has {} {}", region.get_id(), weight_name, weight),
            ));
        }
    }
    Ok(())
}

/// Demand-weighted k-means hubs with the default restart and iteration limits.
pub fn place_hubs_smart(
    regions: &[Region],
    n_hubs: usize,
    random_seed: u64,
) -> Result<Vec<HubLocation>, PlacementError> {
    place_hubs_smart_with(regions, n_hubs, random_seed, &KMeansConfig::default())
}

pub fn place_hubs_smart_with(
    regions: &[Region],
    n_hubs: usize,
    random_seed: u64,
    kmeans: &KMeansConfig,
) -> Result<Vec<HubLocation>, PlacementError> {
    cluster_regions(regions, n_hubs, random_seed, kmeans).map(|outcome| outcome.centers)
}

/// Full clustering result behind [`place_hubs_smart_with`], including member
/// assignments and the weighted inertia of the winning restart.
pub fn cluster_regions(
    regions: &[Region],
    n_hubs: usize,
    random_seed: u64,
    kmeans: &KMeansConfig,
) -> Result<ClusteringOutcome, PlacementError> {
    let _timing = logging::start_timing(
        "place_hubs_smart",
        OperationCategory::Placement { subcategory: PlacementType::Smart },
    );

    validate_hub_count(regions, n_hubs)?;
    validate_regions(regions, "demand_weight", Region::get_demand_weight)?;

    let points: Vec<Coordinate> = regions.iter().map(|r| *r.get_coordinate()).collect();
    let mut weights: Vec<f64> = regions.iter().map(Region::get_demand_weight).collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        warn!("all demand weights are zero, clustering regions unweighted");
        weights.iter_mut().for_each(|w| *w = 1.0);
    } else if !total.is_finite() {
        return Err(PlacementError::degenerate(format!(
            "total demand weight overflows ({}); rescale the weights",
            total
        )));
    }

    let outcome = WeightedKMeans::new(&points, &weights, *kmeans).fit(n_hubs, random_seed)?;

    if !outcome.converged {
        debug!(iterations = outcome.iterations, "best k-means run hit the iteration cap");
    }
    info!(
        n_hubs,
        regions = regions.len(),
        inertia = outcome.inertia,
        "smart hubs placed"
    );
    Ok(outcome)
}
