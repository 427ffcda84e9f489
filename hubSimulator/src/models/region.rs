use serde::{Deserialize, Serialize};
use crate::data::poi::{POI, Coordinate};

/// One neighbourhood or administrative unit, already projected and weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    id: String,
    centroid: Coordinate,
    demand_weight: f64,
    population_weight: f64,
}

impl Region {
    pub fn new(id: impl Into<String>, centroid: Coordinate, demand_weight: f64, population_weight: f64) -> Self {
        Region {
            id: id.into(),
            centroid,
            demand_weight,
            population_weight,
        }
    }

    pub fn get_centroid(&self) -> &Coordinate {
        &self.centroid
    }

    /// Unmet demand: `max(0, demand_score - supply_penalty)`, computed upstream.
    pub fn get_demand_weight(&self) -> f64 {
        self.demand_weight
    }

    pub fn get_population_weight(&self) -> f64 {
        self.population_weight
    }
}

impl POI for Region {
    fn get_coordinate(&self) -> &Coordinate {
        &self.centroid
    }

    fn get_id(&self) -> &str {
        &self.id
    }
}
