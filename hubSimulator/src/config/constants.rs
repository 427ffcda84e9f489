// K-Means Placement Constants
pub const KMEANS_N_INIT: usize = 10;                 // Random restarts, best inertia kept
pub const KMEANS_MAX_ITERATIONS: usize = 300;        // Lloyd iterations per restart

// Coverage Constants
pub const COVERAGE_RADIUS_M: f64 = 500.0;            // Walking distance threshold
pub const PERCENT_SCALE: f64 = 100.0;

// Baseline Comparison Constants
pub const BASELINE_ITERATIONS: usize = 300;
pub const BASELINE_SEED: u64 = 42;

// Scenario hub counts
pub const DEFAULT_SCENARIOS: [usize; 3] = [10, 25, 50];

// Defaults reported when a weight total is zero
pub const DEFAULT_COVERAGE: f64 = 0.0;
pub const DEFAULT_IMPROVEMENT: f64 = 0.0;

// Metric names used in summaries and exports
pub const METRIC_AVG_COVERAGE: &str = "avg_coverage";
pub const METRIC_NEIGHBORHOODS_SERVED: &str = "neighborhoods_served";
pub const METRIC_DEMAND_SATISFIED: &str = "demand_satisfied";
pub const METRIC_POPULATION_COVERED: &str = "population_covered";
