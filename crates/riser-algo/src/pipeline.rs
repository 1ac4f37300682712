//! End-to-end design: validate, build, solve, decode.

use riser_core::Building;
use tracing::{info, warn};

use crate::error::{DesignError, DesignResult};
use crate::milp::{build_model, decode, solve, Design, SolveStatus, SolverConfig};

/// Options for [`design_network`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesignOptions {
    pub solver: SolverConfig,
    /// Keep a design found before the time limit without proof of optimality
    pub accept_time_limited: bool,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            accept_time_limited: false,
        }
    }
}

impl DesignOptions {
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Decode designs the solver returned on its time limit.
    pub fn accept_time_limited(mut self) -> Self {
        self.accept_time_limited = true;
        self
    }
}

/// Decide whether a solve outcome may be decoded.
///
/// Optimal and gap-bounded results always are. A time-limited result is a
/// `NotOptimal` failure unless the caller opted in; infeasible and failed
/// solves are terminal.
pub fn check_status(status: SolveStatus, options: &DesignOptions) -> DesignResult<()> {
    match status {
        SolveStatus::Optimal | SolveStatus::GapLimit => Ok(()),
        SolveStatus::TimeLimit if options.accept_time_limited => Ok(()),
        SolveStatus::TimeLimit => Err(DesignError::NotOptimal(status)),
        SolveStatus::Infeasible => Err(DesignError::Infeasible),
        SolveStatus::Error => Err(DesignError::Solver(format!("solver returned {status}"))),
    }
}

/// Design the riser network of a validated building.
///
/// Each call builds a fresh model; nothing is shared between runs, so
/// independent buildings may be designed concurrently.
pub fn design_network(building: &Building, options: &DesignOptions) -> DesignResult<Design> {
    info!(
        "Designing riser network: {} floors, {} apartments per floor, {} outlets",
        building.params.floors,
        building.params.apartments_per_floor,
        building.num_outlets()
    );

    let formulation = build_model(building)?;
    let solved = solve(formulation, &options.solver)?;

    if let Err(e) = check_status(solved.status, options) {
        warn!("Discarding {} solve: {}", solved.status, e);
        return Err(e);
    }

    let design = decode(building, &solved)?;
    if !design.summary.balanced {
        warn!(
            "Worst balance mismatch is {:.4} dB; check the loss budget",
            design.summary.max_balance_error_db
        );
    }
    info!("{}", design.headline());
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limited_rejected_by_default() {
        let options = DesignOptions::default();
        assert!(!options.accept_time_limited);
        assert!(matches!(
            check_status(SolveStatus::TimeLimit, &options),
            Err(DesignError::NotOptimal(SolveStatus::TimeLimit))
        ));
    }

    #[test]
    fn test_time_limited_accepted_on_request() {
        let options = DesignOptions::default().accept_time_limited();
        assert!(check_status(SolveStatus::TimeLimit, &options).is_ok());
    }

    #[test]
    fn test_status_policy() {
        for options in [
            DesignOptions::default(),
            DesignOptions::default().accept_time_limited(),
        ] {
            assert!(check_status(SolveStatus::Optimal, &options).is_ok());
            assert!(check_status(SolveStatus::GapLimit, &options).is_ok());
            assert!(matches!(
                check_status(SolveStatus::Infeasible, &options),
                Err(DesignError::Infeasible)
            ));
            assert!(matches!(
                check_status(SolveStatus::Error, &options),
                Err(DesignError::Solver(_))
            ));
        }
    }
}
