//! Crate-level error type for composite operations.

use thiserror::Error;

use crate::scenario::ScenarioError;
use crate::simulation::SimulationError;
use crate::validation::GraphError;

/// Any error the engine can return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let err: TimelineError = GraphError::UnknownDependency {
            task: "licence".to_string(),
            missing: "permit".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Task licence depends on unknown task permit");

        let err: TimelineError = SimulationError::InvalidSimulationDay { day: -3 }.into();
        assert_eq!(
            err.to_string(),
            "Simulation day must be non-negative, got -3"
        );
    }
}
