// Weighted Lloyd iteration with weighted k-means++ seeding

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::simulation_config::KMeansConfig;
use crate::core::baseline::draw_weighted_index;
use crate::core::error::PlacementError;
use crate::data::poi::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    pub centers: Vec<Coordinate>,
    pub assignments: Vec<usize>,
    /// Weighted within-cluster sum of squares.
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
}

pub struct WeightedKMeans<'a> {
    points: &'a [Coordinate],
    weights: &'a [f64],
    config: KMeansConfig,
}

impl<'a> WeightedKMeans<'a> {
    /// `weights` must be non-negative with a positive total; callers substitute
    /// uniform weights beforehand when every weight is zero.
    pub fn new(points: &'a [Coordinate], weights: &'a [f64], config: KMeansConfig) -> Self {
        Self { points, weights, config }
    }

    /// Best of `n_init` seeded runs by inertia. Earlier runs win ties.
    pub fn fit(&self, n_clusters: usize, seed: u64) -> Result<ClusteringOutcome, PlacementError> {
        if n_clusters == 0 || n_clusters > self.points.len() {
            return Err(PlacementError::invalid(
                "n_hubs",
                format!("must be between 1 and {}, got {}", self.points.len(), n_clusters),
            ));
        }
        if self.points.len() != self.weights.len() {
            return Err(PlacementError::invalid(
                "weights",
                format!("expected {} weights, got {}", self.points.len(), self.weights.len()),
            ));
        }
        self.config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut best: Option<ClusteringOutcome> = None;

        for run in 0..self.config.n_init {
            let outcome = self.run_once(n_clusters, &mut rng)?;
            debug!(
                run,
                inertia = outcome.inertia,
                iterations = outcome.iterations,
                converged = outcome.converged,
                "k-means restart finished"
            );
            let better = best.as_ref().map_or(true, |current| outcome.inertia < current.inertia);
            if better {
                best = Some(outcome);
            }
        }

        best.ok_or_else(|| PlacementError::degenerate("no k-means run produced a result"))
    }

    fn run_once(&self, k: usize, rng: &mut StdRng) -> Result<ClusteringOutcome, PlacementError> {
        let mut centers = self.init_centers(k, rng);
        let mut assignments = vec![usize::MAX; self.points.len()];
        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.config.max_iterations {
            iterations += 1;
            if !self.assign(&centers, &mut assignments) {
                converged = true;
                break;
            }
            self.update_centers(&mut centers, &mut assignments)?;
        }

        // Keep assignments consistent with the final centers
        if !converged {
            self.assign(&centers, &mut assignments);
        }

        let inertia = self.inertia(&centers, &assignments);
        Ok(ClusteringOutcome {
            centers,
            assignments,
            inertia,
            iterations,
            converged,
        })
    }

    /// Weighted k-means++: first center drawn by weight, the rest by weight * D^2.
    fn init_centers(&self, k: usize, rng: &mut StdRng) -> Vec<Coordinate> {
        let n = self.points.len();
        let mut chosen = vec![false; n];
        let mut centers = Vec::with_capacity(k);

        let total_weight: f64 = self.weights.iter().sum();
        let first = draw_weighted_index(self.weights, total_weight, rng)
            .unwrap_or_else(|| rng.gen_range(0..n));
        chosen[first] = true;
        centers.push(self.points[first]);

        let mut closest_sq: Vec<f64> = self
            .points
            .iter()
            .map(|p| p.squared_distance_to(&self.points[first]))
            .collect();

        while centers.len() < k {
            let scores: Vec<f64> = (0..n)
                .map(|i| if chosen[i] { 0.0 } else { self.weights[i] * closest_sq[i] })
                .collect();
            let total: f64 = scores.iter().sum();

            let next = draw_weighted_index(&scores, total, rng)
                .or_else(|| farthest_unchosen(&closest_sq, &chosen))
                .unwrap_or(first);
            chosen[next] = true;
            let center = self.points[next];
            centers.push(center);

            for (slot, point) in closest_sq.iter_mut().zip(self.points) {
                let d2 = point.squared_distance_to(&center);
                if d2 < *slot {
                    *slot = d2;
                }
            }
        }

        centers
    }

    /// Nearest center per point, lowest index on ties. Returns whether anything moved.
    fn assign(&self, centers: &[Coordinate], assignments: &mut [usize]) -> bool {
        let mut changed = false;
        for (point, slot) in self.points.iter().zip(assignments.iter_mut()) {
            let nearest = nearest_center(point, centers);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }
        changed
    }

    fn update_centers(&self, centers: &mut [Coordinate], assignments: &mut [usize]) -> Result<(), PlacementError> {
        let k = centers.len();
        let mut sum_x = vec![0.0; k];
        let mut sum_y = vec![0.0; k];
        let mut mass = vec![0.0; k];
        let mut plain_x = vec![0.0; k];
        let mut plain_y = vec![0.0; k];
        let mut members = vec![0usize; k];

        for ((point, &weight), &cluster) in self.points.iter().zip(self.weights).zip(assignments.iter()) {
            sum_x[cluster] += weight * point.x;
            sum_y[cluster] += weight * point.y;
            mass[cluster] += weight;
            plain_x[cluster] += point.x;
            plain_y[cluster] += point.y;
            members[cluster] += 1;
        }

        let mut empty = Vec::new();
        for cluster in 0..k {
            if mass[cluster] > 0.0 {
                centers[cluster] = Coordinate::new(sum_x[cluster] / mass[cluster], sum_y[cluster] / mass[cluster]);
            } else if members[cluster] > 0 {
                // Weightless members only: plain mean keeps the center defined
                let count = members[cluster] as f64;
                centers[cluster] = Coordinate::new(plain_x[cluster] / count, plain_y[cluster] / count);
            } else {
                empty.push(cluster);
            }
        }

        let mut reseeded = vec![false; self.points.len()];
        for cluster in empty {
            match self.reseed_candidate(centers, assignments, &reseeded) {
                Some(index) => {
                    debug!(cluster, region = index, "re-seeding empty cluster");
                    reseeded[index] = true;
                    centers[cluster] = self.points[index];
                    assignments[index] = cluster;
                }
                None => {
                    debug!(cluster, "no free region to re-seed from, keeping previous center");
                }
            }
        }

        if let Some(cluster) = centers.iter().position(|c| !c.is_finite()) {
            return Err(PlacementError::degenerate(format!(
                "center {} became non-finite; inspect the demand weight distribution",
                cluster
            )));
        }
        Ok(())
    }

    /// Highest-weight point not already sitting on a center. Ties go to the point
    /// farthest from its current center, then the lowest index.
    fn reseed_candidate(&self, centers: &[Coordinate], assignments: &[usize], taken: &[bool]) -> Option<usize> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (index, point) in self.points.iter().enumerate() {
            if taken[index] || centers.iter().any(|c| c == point) {
                continue;
            }
            let weight = self.weights[index];
            let distance = point.squared_distance_to(&centers[assignments[index]]);
            let better = match best {
                None => true,
                Some((_, best_weight, best_distance)) => {
                    weight > best_weight || (weight == best_weight && distance > best_distance)
                }
            };
            if better {
                best = Some((index, weight, distance));
            }
        }
        best.map(|(index, _, _)| index)
    }

    fn inertia(&self, centers: &[Coordinate], assignments: &[usize]) -> f64 {
        self.points
            .iter()
            .zip(self.weights)
            .zip(assignments)
            .map(|((point, weight), &cluster)| weight * point.squared_distance_to(&centers[cluster]))
            .sum()
    }
}

pub fn nearest_center(point: &Coordinate, centers: &[Coordinate]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let d2 = point.squared_distance_to(center);
        if d2 < best_distance {
            best = index;
            best_distance = d2;
        }
    }
    best
}

fn farthest_unchosen(closest_sq: &[f64], chosen: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &d2) in closest_sq.iter().enumerate() {
        if chosen[index] {
            continue;
        }
        if best.map_or(true, |(_, best_d2)| d2 > best_d2) {
            best = Some((index, d2));
        }
    }
    best.map(|(index, _)| index)
}
