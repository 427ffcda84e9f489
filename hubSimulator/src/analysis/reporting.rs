use super::summary::{MetricSummary, SimulationSummary};

pub fn print_scenario_summary(summary: &SimulationSummary) {
    println!("\nScenario: {} hubs", summary.n_hubs);
    println!("----------------------------------------");
    println!("Coverage radius: {:.0} m", summary.radius_meters);
    println!("Baseline trials: {} (seed {})", summary.iterations, summary.base_seed);
    println!(
        "{:<22} {:>10} {:>12} {:>10} {:>11} {:>10} {:>11}",
        "Metric", "Smart", "Baseline", "Std", "Abs. impr.", "Rel. %", "Percentile"
    );
    for (name, metric) in summary.metrics() {
        print_metric_line(name, metric);
    }
    println!("----------------------------------------");
}

fn print_metric_line(name: &str, metric: &MetricSummary) {
    println!(
        "{:<22} {:>10.3} {:>12.3} {:>10.3} {:>+11.3} {:>+10.1} {:>10.1}%",
        name,
        metric.smart,
        metric.baseline_mean,
        metric.baseline_std,
        metric.absolute_improvement,
        metric.relative_improvement_pct,
        metric.smart_percentile,
    );
}

pub fn print_smart_hubs(summary: &SimulationSummary) {
    println!("\nSmart hub locations ({} hubs):", summary.n_hubs);
    println!("----------------------------------------");
    for (index, hub) in summary.smart_hubs.iter().enumerate() {
        println!("  #{:<3} x: {:.1}, y: {:.1}", index, hub.x, hub.y);
    }
}

/// Improvement of demand satisfaction across every scenario, one line each.
pub fn print_comparison(summaries: &[SimulationSummary]) {
    println!("\nSmart vs. baseline: demand satisfied");
    println!("========================================");
    for summary in summaries {
        let metric = &summary.demand_satisfied;
        println!(
            "{:>4} hubs: smart {:.1}% | baseline {:.1}% ± {:.1} | {:+.1}%",
            summary.n_hubs,
            metric.smart * 100.0,
            metric.baseline_mean * 100.0,
            metric.baseline_std * 100.0,
            metric.relative_improvement_pct,
        );
    }
    println!("========================================");
}
