//! Errors raised while designing a network.

use riser_core::RiserError;
use thiserror::Error;

use crate::milp::SolveStatus;
use crate::topology::TopologyError;

/// Error type for the design pipeline.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The building description is invalid or incomplete
    #[error(transparent)]
    Input(#[from] RiserError),

    /// The floors could not be grouped into riser blocks
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    /// No equipment choice keeps every outlet inside the band
    #[error("model is infeasible: no equipment selection keeps all outlets in band")]
    Infeasible,

    /// The solver failed to run or returned an unusable answer
    #[error("solver failed: {0}")]
    Solver(String),

    /// The solver stopped before proving optimality and the caller asked for proof
    #[error("solver stopped with status '{0}' but an optimal design was required")]
    NotOptimal(SolveStatus),
}

impl DesignError {
    /// Terminal solve status implied by this error, if it came from the solver.
    pub fn status(&self) -> Option<SolveStatus> {
        match self {
            DesignError::Infeasible => Some(SolveStatus::Infeasible),
            DesignError::Solver(_) => Some(SolveStatus::Error),
            DesignError::NotOptimal(status) => Some(*status),
            DesignError::Input(_) | DesignError::Topology(_) => None,
        }
    }
}

impl From<DesignError> for RiserError {
    fn from(err: DesignError) -> Self {
        match err {
            DesignError::Input(inner) => inner,
            DesignError::Topology(inner) => RiserError::Topology(inner.to_string()),
            other => RiserError::Solver(other.to_string()),
        }
    }
}

pub type DesignResult<T> = Result<T, DesignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_errors() {
        assert_eq!(DesignError::Infeasible.status(), Some(SolveStatus::Infeasible));
        assert_eq!(
            DesignError::Solver("boom".into()).status(),
            Some(SolveStatus::Error)
        );
        assert_eq!(DesignError::Topology(TopologyError::NoFloors).status(), None);
    }

    #[test]
    fn test_conversion_into_riser_error() {
        let err: RiserError = DesignError::Topology(TopologyError::NoFloors).into();
        assert!(matches!(err, RiserError::Topology(_)));

        let err: RiserError = DesignError::Infeasible.into();
        assert!(matches!(err, RiserError::Solver(_)));

        let err: RiserError =
            DesignError::Input(RiserError::Validation("bad".into())).into();
        assert!(matches!(err, RiserError::Validation(_)));
    }
}
