use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::poi::Coordinate;
use crate::models::region::Region;
use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Debug)]
pub enum RegionLoadError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    JsonError(serde_json::Error),
    InvalidField(String),
    DuplicateId(String),
    UnsupportedFormat(String),
    Empty,
}

impl From<std::io::Error> for RegionLoadError {
    fn from(err: std::io::Error) -> Self {
        RegionLoadError::IoError(err)
    }
}

impl From<csv::Error> for RegionLoadError {
    fn from(err: csv::Error) -> Self {
        RegionLoadError::CsvError(err)
    }
}

impl From<serde_json::Error> for RegionLoadError {
    fn from(err: serde_json::Error) -> Self {
        RegionLoadError::JsonError(err)
    }
}

impl std::fmt::Display for RegionLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionLoadError::IoError(e) => write!(f, "IO error: {}", e),
            RegionLoadError::CsvError(e) => write!(f, "CSV error: {}", e),
            RegionLoadError::JsonError(e) => write!(f, "JSON error: {}", e),
            RegionLoadError::InvalidField(s) => write!(f, "Invalid field: {}", s),
            RegionLoadError::DuplicateId(id) => write!(f, "Duplicate region id: {}", id),
            RegionLoadError::UnsupportedFormat(ext) => {
                write!(f, "Unsupported region table format '{}', expected .csv or .json", ext)
            }
            RegionLoadError::Empty => write!(f, "Region table contains no rows"),
        }
    }
}

impl std::error::Error for RegionLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegionLoadError::IoError(e) => Some(e),
            RegionLoadError::CsvError(e) => Some(e),
            RegionLoadError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

/// One row of a prepared region table: projected centroid plus weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub demand_weight: f64,
    pub population_weight: f64,
}

#[derive(Debug, Deserialize)]
struct RegionTable {
    regions: Vec<RegionRecord>,
}

/// Load a region table, picking the parser from the file extension.
pub fn load_regions(path: impl AsRef<Path>) -> Result<Vec<Region>, RegionLoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_regions_csv(path),
        "json" => load_regions_json(path),
        other => Err(RegionLoadError::UnsupportedFormat(other.to_string())),
    }
}

pub fn load_regions_csv(path: impl AsRef<Path>) -> Result<Vec<Region>, RegionLoadError> {
    let _timing = logging::start_timing(
        "load_regions_csv",
        OperationCategory::FileIO { subcategory: FileIOType::DataLoad },
    );

    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: RegionRecord = result?;
        records.push(record);
    }

    let regions = regions_from_records(records)?;
    info!(count = regions.len(), path = %path.as_ref().display(), "loaded region table");
    Ok(regions)
}

pub fn load_regions_json(path: impl AsRef<Path>) -> Result<Vec<Region>, RegionLoadError> {
    let _timing = logging::start_timing(
        "load_regions_json",
        OperationCategory::FileIO { subcategory: FileIOType::DataLoad },
    );

    let file = File::open(path.as_ref())?;
    let table: RegionTable = serde_json::from_reader(BufReader::new(file))?;

    let regions = regions_from_records(table.regions)?;
    info!(count = regions.len(), path = %path.as_ref().display(), "loaded region table");
    Ok(regions)
}

/// Validate raw rows and turn them into regions, keeping input order.
pub fn regions_from_records(records: Vec<RegionRecord>) -> Result<Vec<Region>, RegionLoadError> {
    if records.is_empty() {
        return Err(RegionLoadError::Empty);
    }

    let mut seen = HashSet::with_capacity(records.len());
    let mut regions = Vec::with_capacity(records.len());

    for record in records {
        if record.id.is_empty() {
            return Err(RegionLoadError::InvalidField("region id must not be empty".to_string()));
        }
        if !record.x.is_finite() || !record.y.is_finite() {
            return Err(RegionLoadError::InvalidField(format!(
                "region '{}' has a non-finite centroid ({}, {})",
                record.id, record.x, record.y
            )));
        }
        check_weight(&record.id, "demand_weight", record.demand_weight)?;
        check_weight(&record.id, "population_weight", record.population_weight)?;

        if !seen.insert(record.id.clone()) {
            return Err(RegionLoadError::DuplicateId(record.id));
        }

        regions.push(Region::new(
            record.id,
            Coordinate::new(record.x, record.y),
            record.demand_weight,
            record.population_weight,
        ));
    }

    Ok(regions)
}

fn check_weight(id: &str, field: &str, value: f64) -> Result<(), RegionLoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RegionLoadError::InvalidField(format!(
            "region '{}' has {} {}, expected a finite non-negative number",
            id, field, value
        )))
    }
}
