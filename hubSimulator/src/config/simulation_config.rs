use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::constants::{
    BASELINE_ITERATIONS, BASELINE_SEED, COVERAGE_RADIUS_M, DEFAULT_SCENARIOS, KMEANS_MAX_ITERATIONS,
    KMEANS_N_INIT,
};
use crate::core::error::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    pub n_init: usize,          // Independent restarts (>= 1)
    pub max_iterations: usize,  // Lloyd iterations per restart (>= 1)
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: KMEANS_N_INIT,
            max_iterations: KMEANS_MAX_ITERATIONS,
        }
    }
}

impl KMeansConfig {
    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.n_init == 0 {
            return Err(PlacementError::invalid("n_init", "must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(PlacementError::invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

/// Every knob of an A/B run. Passed explicitly into each entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub n_hubs: usize,
    pub radius_meters: f64,
    pub iterations: usize,
    pub base_seed: u64,
    pub scenarios: Vec<usize>,
    pub kmeans: KMeansConfig,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_hubs: DEFAULT_SCENARIOS[0],
            radius_meters: COVERAGE_RADIUS_M,
            iterations: BASELINE_ITERATIONS,
            base_seed: BASELINE_SEED,
            scenarios: DEFAULT_SCENARIOS.to_vec(),
            kmeans: KMeansConfig::default(),
            parallel: false,
        }
    }
}

impl SimulationConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: SimulationConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Copy of this config targeting a single hub count.
    pub fn for_hub_count(&self, n_hubs: usize) -> Self {
        Self {
            n_hubs,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), PlacementError> {
        if self.n_hubs == 0 {
            return Err(PlacementError::invalid("n_hubs", "must be at least 1"));
        }
        if !(self.radius_meters.is_finite() && self.radius_meters > 0.0) {
            return Err(PlacementError::invalid(
                "radius_meters",
                format!("must be a positive finite distance, got {}", self.radius_meters),
            ));
        }
        if self.iterations == 0 {
            return Err(PlacementError::invalid("iterations", "must be at least 1"));
        }
        self.kmeans.validate()
    }
}
