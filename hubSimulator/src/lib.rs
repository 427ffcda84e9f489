// Main module declarations for the hub placement engine

// Placement, evaluation and simulation
pub mod core {
    pub mod error;
    pub mod kmeans;
    pub mod placement;
    pub mod baseline;
    pub mod coverage;
    pub mod ab_simulation;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod simulation_config;
}

// Model definitions
pub mod models {
    pub mod region;
}

// Data loaders
pub mod data {
    pub mod poi;
    pub mod regions_loader;
}

// Aggregated statistics and reporting
pub mod analysis {
    pub mod summary;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod spatial_index;
    pub mod logging;
    pub mod csv_export;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::core::ab_simulation::{
    run_ab_simulation, run_ab_simulation_with_config, run_ab_simulation_with_progress, run_scenarios,
};
pub use crate::core::baseline::place_hubs_baseline;
pub use crate::core::coverage::{evaluate_coverage, CoverageResult};
pub use crate::core::error::PlacementError;
pub use crate::core::placement::{place_hubs_smart, place_hubs_smart_with};
pub use crate::analysis::summary::SimulationSummary;
pub use crate::config::simulation_config::{KMeansConfig, SimulationConfig};
pub use crate::data::poi::{Coordinate, HubLocation};
pub use crate::models::region::Region;
