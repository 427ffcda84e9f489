use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_IMPROVEMENT, METRIC_AVG_COVERAGE, METRIC_DEMAND_SATISFIED, METRIC_NEIGHBORHOODS_SERVED,
    METRIC_POPULATION_COVERED, PERCENT_SCALE,
};
use crate::core::coverage::CoverageResult;
use crate::data::poi::HubLocation;

/// Running statistics of one metric over baseline trials.
///
/// Mean and M2 merge with Chan's parallel update, so accumulators built on
/// different threads combine in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricAccumulator {
    smart: f64,
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    at_or_below_smart: usize,
}

impl MetricAccumulator {
    pub fn new(smart: f64) -> Self {
        Self {
            smart,
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            at_or_below_smart: 0,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if value <= self.smart {
            self.at_or_below_smart += 1;
        }
    }

    pub fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return Self { smart: self.smart, ..other };
        }
        if other.count == 0 {
            return self;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        Self {
            smart: self.smart,
            count,
            mean: self.mean + delta * weight,
            m2: self.m2 + other.m2 + delta * delta * self.count as f64 * weight,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            at_or_below_smart: self.at_or_below_smart + other.at_or_below_smart,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn finish(&self) -> MetricSummary {
        let std = if self.count > 0 {
            (self.m2 / self.count as f64).max(0.0).sqrt()
        } else {
            0.0
        };
        let (min, max) = if self.count > 0 { (self.min, self.max) } else { (0.0, 0.0) };
        let smart_percentile = if self.count > 0 {
            self.at_or_below_smart as f64 / self.count as f64 * PERCENT_SCALE
        } else {
            0.0
        };
        let relative = if self.mean > 0.0 {
            (self.smart - self.mean) / self.mean * PERCENT_SCALE
        } else {
            DEFAULT_IMPROVEMENT
        };

        MetricSummary {
            smart: self.smart,
            baseline_mean: self.mean,
            baseline_std: std,
            baseline_min: min,
            baseline_max: max,
            absolute_improvement: self.smart - self.mean,
            relative_improvement_pct: relative,
            smart_percentile,
        }
    }
}

/// One metric of the smart run against the baseline distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub smart: f64,
    pub baseline_mean: f64,
    /// Population standard deviation over trials.
    pub baseline_std: f64,
    pub baseline_min: f64,
    pub baseline_max: f64,
    pub absolute_improvement: f64,
    /// Zero when the baseline mean is not positive.
    pub relative_improvement_pct: f64,
    /// Share of baseline trials at or below the smart value, 0..=100.
    pub smart_percentile: f64,
}

/// All tracked metrics, accumulated together per trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialAccumulator {
    pub avg_coverage: MetricAccumulator,
    pub neighborhoods_served: MetricAccumulator,
    pub demand_satisfied: MetricAccumulator,
    pub population_covered: MetricAccumulator,
}

impl TrialAccumulator {
    pub fn new(smart: &CoverageResult) -> Self {
        Self {
            avg_coverage: MetricAccumulator::new(smart.avg_coverage),
            neighborhoods_served: MetricAccumulator::new(smart.neighborhoods_served as f64),
            demand_satisfied: MetricAccumulator::new(smart.demand_satisfied),
            population_covered: MetricAccumulator::new(smart.population_covered),
        }
    }

    pub fn push(&mut self, trial: &CoverageResult) {
        self.avg_coverage.push(trial.avg_coverage);
        self.neighborhoods_served.push(trial.neighborhoods_served as f64);
        self.demand_satisfied.push(trial.demand_satisfied);
        self.population_covered.push(trial.population_covered);
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            avg_coverage: self.avg_coverage.merge(other.avg_coverage),
            neighborhoods_served: self.neighborhoods_served.merge(other.neighborhoods_served),
            demand_satisfied: self.demand_satisfied.merge(other.demand_satisfied),
            population_covered: self.population_covered.merge(other.population_covered),
        }
    }

    pub fn trials(&self) -> usize {
        self.avg_coverage.count()
    }
}

/// Flat export record: one metric of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub metric: String,
    pub smart: f64,
    pub baseline_mean: f64,
    pub baseline_std: f64,
    pub absolute_improvement: f64,
    pub relative_improvement_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub n_hubs: usize,
    pub radius_meters: f64,
    pub iterations: usize,
    pub base_seed: u64,
    pub smart_hubs: Vec<HubLocation>,
    pub smart_coverage: CoverageResult,
    pub avg_coverage: MetricSummary,
    pub neighborhoods_served: MetricSummary,
    pub demand_satisfied: MetricSummary,
    pub population_covered: MetricSummary,
}

impl SimulationSummary {
    pub fn metrics(&self) -> [(&'static str, &MetricSummary); 4] {
        [
            (METRIC_AVG_COVERAGE, &self.avg_coverage),
            (METRIC_NEIGHBORHOODS_SERVED, &self.neighborhoods_served),
            (METRIC_DEMAND_SATISFIED, &self.demand_satisfied),
            (METRIC_POPULATION_COVERED, &self.population_covered),
        ]
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.metrics()
            .iter()
            .map(|(name, metric)| SummaryRow {
                metric: name.to_string(),
                smart: metric.smart,
                baseline_mean: metric.baseline_mean,
                baseline_std: metric.baseline_std,
                absolute_improvement: metric.absolute_improvement,
                relative_improvement_pct: metric.relative_improvement_pct,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(smart: f64, values: &[f64]) -> MetricAccumulator {
        let mut acc = MetricAccumulator::new(smart);
        for &v in values {
            acc.push(v);
        }
        acc
    }

    #[test]
    fn population_std_and_improvements() {
        let summary = filled(6.0, &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).finish();
        assert!((summary.baseline_mean - 5.0).abs() < 1e-12);
        assert!((summary.baseline_std - 2.0).abs() < 1e-12);
        assert_eq!(summary.baseline_min, 2.0);
        assert_eq!(summary.baseline_max, 9.0);
        assert!((summary.absolute_improvement - 1.0).abs() < 1e-12);
        assert!((summary.relative_improvement_pct - 20.0).abs() < 1e-9);
        assert!((summary.smart_percentile - 75.0).abs() < 1e-12);
    }

    #[test]
    fn merge_matches_single_pass() {
        let values = [0.3, 0.9, 0.1, 0.4, 0.8, 0.5, 0.2];
        let whole = filled(0.6, &values);
        let left = filled(0.6, &values[..3]);
        let right = filled(0.6, &values[3..]);

        let merged = left.merge(right);
        assert_eq!(merged.count(), whole.count());
        let (a, b) = (merged.finish(), whole.finish());
        assert!((a.baseline_mean - b.baseline_mean).abs() < 1e-12);
        assert!((a.baseline_std - b.baseline_std).abs() < 1e-12);
        assert_eq!(a.smart_percentile, b.smart_percentile);

        let empty = MetricAccumulator::new(0.6);
        assert_eq!(empty.merge(whole), whole);
        assert_eq!(whole.merge(empty), whole);
    }

    #[test]
    fn zero_baseline_mean_gives_zero_relative_improvement() {
        let summary = filled(0.5, &[0.0, 0.0, 0.0]).finish();
        assert_eq!(summary.relative_improvement_pct, 0.0);
        assert_eq!(summary.absolute_improvement, 0.5);
        assert_eq!(summary.baseline_std, 0.0);
    }
}
