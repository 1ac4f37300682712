//! HiGHS invocation and status interpretation.

use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::solvers::SolutionStatus as LpStatus;
use good_lp::{ResolutionError, Solution, SolverModel};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::formulation::{Decisions, Formulation, NetworkLayout};
use crate::error::{DesignError, DesignResult};

/// Solver decisions evaluated at the returned point.
pub type Assignment = Decisions<f64>;

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock budget (seconds)
    pub time_limit_secs: f64,
    /// Relative MIP gap at which the search stops
    pub relative_gap: f64,
    /// Solver threads; `None` lets HiGHS decide
    pub threads: Option<u32>,
    /// Print the solver log to stdout
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 20.0,
            relative_gap: 0.05,
            threads: Some(4),
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_secs = seconds;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.relative_gap = gap;
        self
    }

    pub fn with_threads(mut self, threads: Option<u32>) -> Self {
        self.threads = threads;
        self
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal within the relative gap
    Optimal,
    /// Stopped on the gap criterion with a feasible design
    GapLimit,
    /// Stopped on the time limit with a feasible design
    TimeLimit,
    /// No design satisfies the constraints
    Infeasible,
    /// The solver failed
    Error,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// A design was found, optimal or not.
    pub fn has_design(&self) -> bool {
        matches!(
            self,
            SolveStatus::Optimal | SolveStatus::GapLimit | SolveStatus::TimeLimit
        )
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::GapLimit => write!(f, "gap_limit"),
            SolveStatus::TimeLimit => write!(f, "time_limit"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Error => write!(f, "error"),
        }
    }
}

impl From<LpStatus> for SolveStatus {
    fn from(status: LpStatus) -> Self {
        match status {
            LpStatus::Optimal => SolveStatus::Optimal,
            LpStatus::GapLimit => SolveStatus::GapLimit,
            LpStatus::TimeLimit => SolveStatus::TimeLimit,
        }
    }
}

/// A solved model ready for decoding.
#[derive(Debug, Clone)]
pub struct SolvedModel {
    pub status: SolveStatus,
    pub assignment: Assignment,
    pub layout: NetworkLayout,
    /// Σ (excess + shortfall) at the returned point
    pub objective: f64,
    pub solve_time: Duration,
}

/// Hand the formulation to HiGHS and evaluate every decision.
///
/// Infeasibility and solver failures are terminal; a time-limited design
/// is returned with its status so the caller can decide whether to keep it.
pub fn solve(formulation: Formulation, config: &SolverConfig) -> DesignResult<SolvedModel> {
    let Formulation {
        variables,
        objective,
        constraints,
        decisions,
        layout,
    } = formulation;

    info!(
        "Solving riser MILP with HiGHS: {} constraints, time limit {}s, gap {}",
        constraints.len(),
        config.time_limit_secs,
        config.relative_gap
    );

    let mut model = variables.minimise(objective).using(highs);
    model.set_verbose(config.verbose);
    let mut model = model
        .set_option("time_limit", config.time_limit_secs)
        .set_option("mip_rel_gap", config.relative_gap);
    if let Some(threads) = config.threads {
        model = model.set_option("threads", i32::try_from(threads).unwrap_or(i32::MAX));
    }
    for c in constraints {
        model = model.with(c);
    }

    let start = Instant::now();
    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            warn!("Riser MILP is infeasible");
            return Err(DesignError::Infeasible);
        }
        Err(e) => return Err(DesignError::Solver(e.to_string())),
    };
    let solve_time = start.elapsed();

    let status = SolveStatus::from(solution.status());
    let assignment = decisions.map(|v| solution.value(*v));
    let objective = assignment.excess.values().sum::<f64>()
        + assignment.shortfall.values().sum::<f64>();

    if status.is_optimal() {
        info!(
            "HiGHS finished in {:.3}s: status={}, total deviation={:.3} dB",
            solve_time.as_secs_f64(),
            status,
            objective
        );
    } else {
        warn!(
            "HiGHS stopped early after {:.3}s: status={}, total deviation={:.3} dB",
            solve_time.as_secs_f64(),
            status,
            objective
        );
    }

    Ok(SolvedModel {
        status,
        assignment,
        layout,
        objective,
        solve_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit_secs, 20.0);
        assert_eq!(config.relative_gap, 0.05);
        assert_eq!(config.threads, Some(4));
        assert!(!config.verbose);
    }

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(SolveStatus::TimeLimit.to_string(), "time_limit");
        let json = serde_json::to_string(&SolveStatus::GapLimit).expect("serialize");
        assert_eq!(json, "\"gap_limit\"");
        assert!(SolveStatus::TimeLimit.has_design());
        assert!(!SolveStatus::Infeasible.has_design());
        assert!(!SolveStatus::GapLimit.is_optimal());
    }
}
