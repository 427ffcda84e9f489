use std::path::PathBuf;

use clap::Parser;

use crate::config::simulation_config::SimulationConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Demand-aware hub placement with an A/B baseline simulation", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Prepared region table (.csv or .json)")]
    regions: PathBuf,

    #[arg(short, long, help = "JSON file with a SimulationConfig; flags below override it")]
    config: Option<PathBuf>,

    #[arg(short = 'k', long, value_delimiter = ',', help = "Hub counts to simulate, e.g. 10,25,50")]
    hubs: Option<Vec<usize>>,

    #[arg(long, help = "Coverage radius in meters")]
    radius: Option<f64>,

    #[arg(short = 'n', long, help = "Baseline trials per scenario")]
    iterations: Option<usize>,

    #[arg(short, long, help = "Base random seed")]
    seed: Option<u64>,

    #[arg(long, help = "K-means restarts")]
    n_init: Option<usize>,

    #[arg(long, help = "Lloyd iterations per restart")]
    max_iterations: Option<usize>,

    #[arg(short, long, default_value_t = false)]
    parallel: bool,

    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    enable_csv_export: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,

    #[arg(long, default_value_t = false, help = "Print every smart hub coordinate")]
    show_hubs: bool,
}

impl Args {
    pub fn regions(&self) -> &PathBuf {
        &self.regions
    }

    pub fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn hubs(&self) -> Option<&[usize]> {
        self.hubs.as_deref()
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn enable_csv_export(&self) -> bool {
        self.enable_csv_export
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    pub fn show_hubs(&self) -> bool {
        self.show_hubs
    }

    /// Overlay the flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(hubs) = self.hubs() {
            config.scenarios = hubs.to_vec();
            if let Some(&first) = hubs.first() {
                config.n_hubs = first;
            }
        }
        if let Some(radius) = self.radius {
            config.radius_meters = radius;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.base_seed = seed;
        }
        if let Some(n_init) = self.n_init {
            config.kmeans.n_init = n_init;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.kmeans.max_iterations = max_iterations;
        }
        if self.parallel {
            config.parallel = true;
        }
    }
}
