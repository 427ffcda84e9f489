use std::fs;

use evhub::data::poi::POI;
use evhub::data::regions_loader::{load_regions, RegionLoadError};
use evhub::utils::csv_export::CsvExporter;
use evhub::{run_scenarios, SimulationConfig};
use tempfile::tempdir;

const REGION_CSV: &str = "id,x,y,demand_weight,population_weight
centro,0.0,0.0,12.5,3400
norte,900.0,1200.0,3.0,1800
sur,-400.0,-1500.0,0.0,2600
este,2100.0,100.0,7.25,900
";

#[test]
fn loads_csv_table_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("regions.csv");
    fs::write(&path, REGION_CSV).unwrap();

    let regions = load_regions(&path).unwrap();
    assert_eq!(regions.len(), 4);
    assert_eq!(regions[0].get_id(), "centro");
    assert_eq!(regions[2].get_demand_weight(), 0.0);
    assert_eq!(regions[3].get_population_weight(), 900.0);
    assert_eq!(regions[1].get_centroid().y, 1200.0);
}

#[test]
fn loads_json_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("regions.json");
    fs::write(
        &path,
        r#"{"regions": [
            {"id": "a", "x": 10.0, "y": 20.0, "demand_weight": 1.5, "population_weight": 100.0},
            {"id": "b", "x": -3.0, "y": 4.0, "demand_weight": 0.0, "population_weight": 0.0}
        ]}"#,
    )
    .unwrap();

    let regions = load_regions(&path).unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[1].get_id(), "b");
    assert_eq!(regions[0].get_centroid().x, 10.0);
}

#[test]
fn rejects_duplicate_ids_and_negative_weights() {
    let dir = tempdir().unwrap();

    let duplicate = dir.path().join("dup.csv");
    fs::write(&duplicate, "id,x,y,demand_weight,population_weight\na,0,0,1,1\na,1,1,1,1\n").unwrap();
    assert!(matches!(load_regions(&duplicate), Err(RegionLoadError::DuplicateId(id)) if id == "a"));

    let negative = dir.path().join("neg.csv");
    fs::write(&negative, "id,x,y,demand_weight,population_weight\na,0,0,-1,1\n").unwrap();
    assert!(matches!(load_regions(&negative), Err(RegionLoadError::InvalidField(_))));

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "id,x,y,demand_weight,population_weight\n").unwrap();
    assert!(matches!(load_regions(&empty), Err(RegionLoadError::Empty)));

    let malformed = dir.path().join("bad.csv");
    fs::write(&malformed, "id,x,y,demand_weight,population_weight\na,zero,0,1,1\n").unwrap();
    assert!(matches!(load_regions(&malformed), Err(RegionLoadError::CsvError(_))));

    assert!(matches!(
        load_regions(dir.path().join("missing.csv")),
        Err(RegionLoadError::IoError(_))
    ));
}

#[test]
fn export_writes_summary_and_hub_tables() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("regions.csv");
    fs::write(&path, REGION_CSV).unwrap();
    let regions = load_regions(&path).unwrap();

    let config = SimulationConfig {
        scenarios: vec![1, 2],
        radius_meters: 1_000.0,
        iterations: 10,
        ..SimulationConfig::default()
    };
    let summaries = run_scenarios(&regions, &config).unwrap();

    let exporter = CsvExporter::new(dir.path().join("out")).unwrap();
    exporter.export_all(&summaries).unwrap();
    assert!(exporter.output_dir().starts_with(dir.path().join("out")));
    assert!(exporter.output_dir().ends_with(exporter.timestamp()));

    let mut summary_reader = csv::Reader::from_path(exporter.output_dir().join("summary.csv")).unwrap();
    let headers: Vec<String> = summary_reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        vec![
            "n_hubs",
            "metric",
            "smart",
            "baseline_mean",
            "baseline_std",
            "absolute_improvement",
            "relative_improvement_pct"
        ]
    );
    let rows: Vec<csv::StringRecord> = summary_reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2 * 4);
    assert_eq!(&rows[0][0], "1");
    assert_eq!(&rows[0][1], "avg_coverage");
    assert_eq!(&rows[7][0], "2");
    assert_eq!(&rows[7][1], "population_covered");

    let mut hub_reader = csv::Reader::from_path(exporter.output_dir().join("smart_hubs.csv")).unwrap();
    let hub_headers: Vec<String> = hub_reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(hub_headers, vec!["n_hubs", "hub_index", "x", "y"]);
    assert_eq!(hub_reader.records().count(), 1 + 2);
}
