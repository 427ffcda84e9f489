#[derive(Debug)]
pub enum PlacementError {
    /// A caller-supplied parameter is out of range. Not recoverable internally.
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
    /// Clustering reached a non-finite state even after re-seeding.
    NumericDegeneracy {
        message: String,
    },
    /// A baseline trial failed; the whole run is discarded.
    SimulationAborted {
        iteration: usize,
        source: Box<PlacementError>,
    },
}

impl PlacementError {
    pub fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        PlacementError::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        PlacementError::NumericDegeneracy {
            message: message.into(),
        }
    }

    pub fn aborted(iteration: usize, source: PlacementError) -> Self {
        PlacementError::SimulationAborted {
            iteration,
            source: Box::new(source),
        }
    }

    /// Name of the offending parameter, looking through aborted trials.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            PlacementError::InvalidParameter { parameter, .. } => Some(*parameter),
            PlacementError::NumericDegeneracy { .. } => None,
            PlacementError::SimulationAborted { source, .. } => source.parameter(),
        }
    }
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::InvalidParameter { parameter, message } => {
                write!(f, "Invalid parameter '{}': {}", parameter, message)
            }
            PlacementError::NumericDegeneracy { message } => {
                write!(f, "Numeric degeneracy: {}", message)
            }
            PlacementError::SimulationAborted { iteration, source } => {
                write!(f, "Simulation aborted at baseline iteration {}: {}", iteration, source)
            }
        }
    }
}

impl std::error::Error for PlacementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlacementError::SimulationAborted { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
