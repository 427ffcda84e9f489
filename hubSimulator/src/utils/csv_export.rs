use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::analysis::summary::SimulationSummary;
use crate::utils::logging::{self, FileIOType, OperationCategory};

const SUMMARY_FILE: &str = "summary.csv";
const SMART_HUBS_FILE: &str = "smart_hubs.csv";

#[derive(Debug, Serialize)]
struct ScenarioRow<'a> {
    n_hubs: usize,
    metric: &'a str,
    smart: f64,
    baseline_mean: f64,
    baseline_std: f64,
    absolute_improvement: f64,
    relative_improvement_pct: f64,
}

#[derive(Debug, Serialize)]
struct HubRow {
    n_hubs: usize,
    hub_index: usize,
    x: f64,
    y: f64,
}

/// Writes scenario results into a fresh timestamped directory.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
}

impl CsvExporter {
    /// Create `<output_dir>/<YYYYmmdd_HHMMSS>/`.
    pub fn new(output_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&full_path)?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Both files for every scenario.
    pub fn export_all(&self, summaries: &[SimulationSummary]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let _timing = logging::start_timing(
            "export_results",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave },
        );

        self.export_summaries(summaries)?;
        self.export_smart_hubs(summaries)?;

        info!(dir = %self.output_dir.display(), "CSV export completed");
        Ok(())
    }

    /// One row per scenario and metric.
    pub fn export_summaries(&self, summaries: &[SimulationSummary]) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let mut writer = csv::Writer::from_path(&path)?;

        for summary in summaries {
            for row in summary.rows() {
                writer.serialize(ScenarioRow {
                    n_hubs: summary.n_hubs,
                    metric: &row.metric,
                    smart: row.smart,
                    baseline_mean: row.baseline_mean,
                    baseline_std: row.baseline_std,
                    absolute_improvement: row.absolute_improvement,
                    relative_improvement_pct: row.relative_improvement_pct,
                })?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    pub fn export_smart_hubs(&self, summaries: &[SimulationSummary]) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let path = self.output_dir.join(SMART_HUBS_FILE);
        let mut writer = csv::Writer::from_path(&path)?;

        for summary in summaries {
            for (hub_index, hub) in summary.smart_hubs.iter().enumerate() {
                writer.serialize(HubRow {
                    n_hubs: summary.n_hubs,
                    hub_index,
                    x: hub.x,
                    y: hub.y,
                })?;
            }
        }

        writer.flush()?;
        Ok(path)
    }
}
