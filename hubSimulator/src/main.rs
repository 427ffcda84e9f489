use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use evhub::analysis::reporting;
use evhub::analysis::summary::SimulationSummary;
use evhub::cli::cli::Args;
use evhub::config::simulation_config::SimulationConfig;
use evhub::core::ab_simulation::run_ab_simulation_with_progress;
use evhub::data::regions_loader;
use evhub::utils::csv_export::CsvExporter;
use evhub::utils::logging;

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging());

    println!("EV Hub Placement Engine");
    println!(
        "Debug logging: {}, CSV export: {}, Parallel trials: {}",
        if args.debug_logging() { "enabled" } else { "disabled" },
        if args.enable_csv_export() { "enabled" } else { "disabled" },
        if args.parallel() { "enabled" } else { "disabled" }
    );

    let mut config = match args.config() {
        Some(path) => SimulationConfig::load_from_file(path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    args.apply_overrides(&mut config);
    if config.scenarios.is_empty() {
        bail!("no hub counts to simulate; pass --hubs or set \"scenarios\" in the config");
    }

    let regions = regions_loader::load_regions(args.regions())
        .with_context(|| format!("failed to load regions from {}", args.regions().display()))?;
    println!("Loaded {} regions from {}", regions.len(), args.regions().display());

    let mut summaries: Vec<SimulationSummary> = Vec::with_capacity(config.scenarios.len());
    for &n_hubs in &config.scenarios {
        let scenario = config.for_hub_count(n_hubs);
        let bar = trial_bar(scenario.iterations as u64, n_hubs);

        let summary = run_ab_simulation_with_progress(&regions, &scenario, || bar.inc(1))
            .with_context(|| format!("scenario with {} hubs failed", n_hubs))?;
        bar.finish_and_clear();

        reporting::print_scenario_summary(&summary);
        if args.show_hubs() {
            reporting::print_smart_hubs(&summary);
        }
        summaries.push(summary);
    }

    reporting::print_comparison(&summaries);

    if args.enable_csv_export() {
        let exporter = CsvExporter::new(args.output_dir())
            .with_context(|| format!("failed to create {}", args.output_dir().display()))?;
        exporter
            .export_all(&summaries)
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to export results")?;
        println!("Results written to {}", exporter.output_dir().display());
    }

    logging::print_timing_report();
    Ok(())
}

fn trial_bar(total: u64, n_hubs: usize) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} trials ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format!("{} hubs", n_hubs));
    bar
}
