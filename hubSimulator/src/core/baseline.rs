use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::error::PlacementError;
use crate::core::placement::{validate_hub_count, validate_regions};
use crate::data::poi::{HubLocation, POI};
use crate::models::region::Region;
use crate::utils::logging::{self, OperationCategory, PlacementType};

/// Draw one index with probability proportional to its weight.
///
/// Non-positive weights are never drawn. Returns `None` when `total` has no
/// positive mass left to draw from.
pub fn draw_weighted_index(weights: &[f64], total: f64, rng: &mut StdRng) -> Option<usize> {
    if !(total.is_finite() && total > 0.0) {
        return None;
    }

    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(index);
        if target < cumulative {
            return Some(index);
        }
    }

    // Rounding can leave the target just past the final bucket
    last_positive
}

/// Sequential weighted sampling without replacement.
///
/// Each draw renormalizes over the weight still in the pool. Once no positive
/// weight remains the rest of the picks are uniform over unchosen indices.
pub struct WeightedSampler {
    remaining: Vec<f64>,
    remaining_total: f64,
    chosen: Vec<bool>,
}

impl WeightedSampler {
    pub fn new(weights: &[f64]) -> Self {
        let remaining: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
        let remaining_total = remaining.iter().sum();
        Self {
            remaining,
            remaining_total,
            chosen: vec![false; weights.len()],
        }
    }

    pub fn draw(&mut self, rng: &mut StdRng) -> Option<usize> {
        let index = match draw_weighted_index(&self.remaining, self.remaining_total, rng) {
            Some(index) => index,
            None => {
                let unchosen: Vec<usize> = (0..self.chosen.len()).filter(|&i| !self.chosen[i]).collect();
                if unchosen.is_empty() {
                    return None;
                }
                unchosen[rng.gen_range(0..unchosen.len())]
            }
        };

        self.chosen[index] = true;
        self.remaining[index] = 0.0;
        // Re-sum instead of subtracting so drift never leaves phantom mass
        self.remaining_total = self.remaining.iter().sum();
        Some(index)
    }

    pub fn sample(mut self, count: usize, rng: &mut StdRng) -> Vec<usize> {
        let mut picks = Vec::with_capacity(count);
        while picks.len() < count {
            match self.draw(rng) {
                Some(index) => picks.push(index),
                None => break,
            }
        }
        picks
    }
}

/// Population-weighted random hubs: `n_hubs` distinct region centroids.
pub fn place_hubs_baseline(
    regions: &[Region],
    n_hubs: usize,
    random_seed: u64,
) -> Result<Vec<HubLocation>, PlacementError> {
    let _timing = logging::start_timing(
        "place_hubs_baseline",
        OperationCategory::Placement { subcategory: PlacementType::Baseline },
    );

    validate_hub_count(regions, n_hubs)?;
    validate_regions(regions, "population_weight", Region::get_population_weight)?;

    if n_hubs == regions.len() {
        return Ok(regions.iter().map(|r| *r.get_coordinate()).collect());
    }

    let weights: Vec<f64> = regions.iter().map(Region::get_population_weight).collect();
    let mut rng = StdRng::seed_from_u64(random_seed);
    let picks = WeightedSampler::new(&weights).sample(n_hubs, &mut rng);

    debug!(n_hubs, seed = random_seed, "baseline hubs sampled");
    Ok(picks.into_iter().map(|i| *regions[i].get_coordinate()).collect())
}
